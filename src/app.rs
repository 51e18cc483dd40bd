use crate::assistant::{
    CannedResponder, ChatEntry, ChatLog, ChatResponder, PlaceholderRoutine, RoutineProvider,
};
use crate::catalog::fetch::CatalogFetcher;
use crate::catalog::{categories, filter_by_category, Product};
use crate::event::AppEvent;
use crate::selection::{store, Selection};
use crate::theme::Theme;
use eframe::egui::{self, Color32, RichText, ScrollArea};
use std::sync::mpsc::{Receiver, TryRecvError};
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tracing::{info, warn};

#[derive(Debug)]
enum CatalogState {
    Loading,
    Ready(Vec<Product>),
    Unavailable(String),
}

pub struct PetalApp {
    rx: Receiver<AppEvent>,
    fetcher: CatalogFetcher,
    theme: Theme,
    catalog: CatalogState,
    category: Option<String>,
    visible: Vec<Product>,
    selection: Selection,
    hidden_selection_count: usize,
    routine_provider: Box<dyn RoutineProvider>,
    chat_responder: Box<dyn ChatResponder>,
    chat_log: ChatLog,
    input_buffer: String,
    generate_warning: Option<String>,
    diagnostics_log: Vec<String>,
    scroll_to_bottom: bool,
    theme_applied: bool,
}

impl PetalApp {
    pub fn new(rx: Receiver<AppEvent>, fetcher: CatalogFetcher) -> Self {
        Self {
            rx,
            fetcher,
            theme: Theme::default(),
            catalog: CatalogState::Loading,
            category: None,
            visible: Vec::new(),
            selection: Selection::default(),
            hidden_selection_count: 0,
            routine_provider: Box::new(PlaceholderRoutine),
            chat_responder: Box::new(CannedResponder),
            chat_log: ChatLog::default(),
            input_buffer: String::new(),
            generate_warning: None,
            diagnostics_log: Vec::new(),
            scroll_to_bottom: false,
            theme_applied: false,
        }
    }

    fn timestamp() -> String {
        match SystemTime::now().duration_since(UNIX_EPOCH) {
            Ok(duration) => duration.as_secs().to_string(),
            Err(_) => "0".to_string(),
        }
    }

    fn log_diagnostic(&mut self, message: impl Into<String>) {
        self.diagnostics_log
            .push(format!("[{}] {}", Self::timestamp(), message.into()));
    }

    fn drain_events(&mut self, ctx: &egui::Context) {
        loop {
            match self.rx.try_recv() {
                Ok(event) => {
                    self.apply_event(event);
                    ctx.request_repaint();
                }
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    self.log_diagnostic("event channel disconnected");
                    break;
                }
            }
        }
    }

    fn apply_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::CatalogLoaded(products) => {
                info!(count = products.len(), "catalog loaded");
                self.catalog = CatalogState::Ready(products);
                match self.category.clone() {
                    Some(category) => self.select_category(category),
                    None => self.rebuild_visible(),
                }
            }
            AppEvent::CatalogFailed(reason) => {
                warn!(%reason, "catalog fetch failed");
                self.log_diagnostic(format!("catalog fetch failed: {reason}"));
                self.catalog = CatalogState::Unavailable(reason);
                self.visible.clear();
            }
        }
    }

    fn rebuild_visible(&mut self) {
        self.visible = match (&self.catalog, &self.category) {
            (CatalogState::Ready(products), Some(category)) => {
                filter_by_category(products, category)
            }
            (CatalogState::Ready(products), None) => products.clone(),
            _ => Vec::new(),
        };
    }

    fn select_category(&mut self, category: String) {
        let (stored_ids, warning) = store::load();
        if let Some(warning) = warning {
            warn!(%warning, "selection record unreadable");
            self.log_diagnostic(format!("selection load warning: {warning}"));
        }
        self.apply_category(category, &stored_ids);
    }

    /// Filters the grid to the category and hydrates the selection against
    /// it. Stored ids without a visible card are dropped from the hydrated
    /// selection but counted for the "hidden, not lost" notice.
    fn apply_category(&mut self, category: String, stored_ids: &[String]) {
        self.category = Some(category);
        self.rebuild_visible();
        self.selection = Selection::hydrate(stored_ids, &self.visible);
        self.hidden_selection_count = stored_ids.len().saturating_sub(self.selection.len());
    }

    fn persist_selection(&mut self) {
        if let Err(err) = store::save(&self.selection.ids()) {
            warn!(error = %err, "failed to persist selection");
            self.log_diagnostic(format!("failed to persist selection: {err}"));
        }
    }

    fn toggle_product(&mut self, product: &Product) {
        self.selection.toggle(product);
        self.persist_selection();
        self.hidden_selection_count = 0;
    }

    fn remove_selected(&mut self, id: &str) {
        if self.selection.remove(id) {
            self.persist_selection();
            self.hidden_selection_count = 0;
        }
    }

    fn generate_routine(&mut self) {
        if self.selection.is_empty() {
            self.generate_warning =
                Some("Select at least one product to generate a routine.".to_string());
            return;
        }

        self.generate_warning = None;
        let routine = self.routine_provider.generate(self.selection.entries());
        self.chat_log.present_routine(routine);
        self.scroll_to_bottom = true;
    }

    fn submit_chat(&mut self) {
        if self
            .chat_log
            .submit(&self.input_buffer, self.chat_responder.as_ref())
        {
            self.input_buffer.clear();
            self.scroll_to_bottom = true;
        }
    }

    fn catalog_status(&self) -> (String, Color32) {
        match &self.catalog {
            CatalogState::Loading => ("Loading catalog...".to_string(), self.theme.warning),
            CatalogState::Ready(products) => {
                (format!("{} products", products.len()), self.theme.success)
            }
            CatalogState::Unavailable(_) => ("Catalog unavailable".to_string(), self.theme.danger),
        }
    }

    fn render_top_bar(&mut self, ctx: &egui::Context) {
        let (status, color) = self.catalog_status();
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.strong("Petal");
                ui.separator();
                ui.label(RichText::new(status).color(color));
                if let Some(category) = &self.category {
                    ui.separator();
                    ui.label(RichText::new(category).color(self.theme.text_muted));
                }
            });
        });
    }

    fn render_selection_panel(&mut self, ctx: &egui::Context) {
        egui::SidePanel::left("selection_panel")
            .resizable(true)
            .show(ctx, |ui| {
                ui.heading("Routine Builder");
                ui.separator();

                ui.strong("Category");
                let options = match &self.catalog {
                    CatalogState::Ready(products) => categories(products),
                    _ => Vec::new(),
                };
                let mut chosen: Option<String> = None;
                ui.add_enabled_ui(!options.is_empty(), |ui| {
                    egui::ComboBox::from_id_salt("category_filter")
                        .selected_text(
                            self.category
                                .clone()
                                .unwrap_or_else(|| "Choose a category".to_string()),
                        )
                        .show_ui(ui, |ui| {
                            for category in &options {
                                let selected =
                                    self.category.as_deref() == Some(category.as_str());
                                if ui.selectable_label(selected, category).clicked() {
                                    chosen = Some(category.clone());
                                }
                            }
                        });
                });
                if let Some(category) = chosen {
                    if self.category.as_deref() != Some(category.as_str()) {
                        self.select_category(category);
                    }
                }

                ui.separator();
                ui.strong("Selected Products");
                if self.selection.is_empty() {
                    ui.label(RichText::new("Nothing selected yet").color(self.theme.text_muted));
                }

                let mut removed: Option<String> = None;
                for entry in self.selection.entries() {
                    ui.horizontal(|ui| {
                        ui.label(format!("{} ({})", entry.name, entry.brand));
                        if ui.small_button("Remove").clicked() {
                            removed = Some(entry.id.clone());
                        }
                    });
                }
                if let Some(id) = removed {
                    self.remove_selected(&id);
                }

                if self.hidden_selection_count > 0 {
                    ui.label(
                        RichText::new(
                            "Selections outside the current category are hidden, not lost.",
                        )
                        .color(self.theme.text_muted)
                        .size(12.0),
                    );
                }

                ui.separator();
                if ui.button("Generate Routine").clicked() {
                    self.generate_routine();
                }
                if let Some(warning) = &self.generate_warning {
                    ui.label(RichText::new(warning).color(self.theme.warning).size(12.0));
                }
            });
    }

    fn render_product_card(&self, ui: &mut egui::Ui, product: &Product) -> bool {
        let selected = self.selection.contains(&product.id);
        let response = self
            .theme
            .product_card_frame(selected)
            .show(ui, |ui| {
                ui.set_width(160.0);
                ui.vertical(|ui| {
                    let monogram = product
                        .name
                        .chars()
                        .next()
                        .map(|ch| ch.to_uppercase().to_string())
                        .unwrap_or_else(|| "?".to_string());
                    self.theme.monogram_frame().show(ui, |ui| {
                        ui.label(
                            RichText::new(monogram)
                                .color(self.theme.accent_primary)
                                .size(22.0),
                        );
                    });
                    ui.add_space(self.theme.spacing_4);
                    ui.label(RichText::new(&product.name).strong());
                    ui.label(
                        RichText::new(&product.brand)
                            .color(self.theme.text_muted)
                            .size(12.0),
                    );
                });
            })
            .response;

        if response.hovered() {
            ui.ctx().set_cursor_icon(egui::CursorIcon::PointingHand);
        }
        response.interact(egui::Sense::click()).clicked()
    }

    fn render_grid(&mut self, ui: &mut egui::Ui) {
        let grid_height = (ui.available_height() * 0.5).max(180.0);

        let unavailable = match &self.catalog {
            CatalogState::Unavailable(reason) => Some(reason.clone()),
            _ => None,
        };
        if let Some(reason) = unavailable {
            ui.label(RichText::new("Catalog unavailable").color(self.theme.danger));
            ui.label(RichText::new(reason).color(self.theme.text_muted).size(12.0));
            if ui.button("Retry").clicked() {
                self.catalog = CatalogState::Loading;
                self.fetcher.fetch();
            }
            ui.add_space(grid_height - 60.0);
            return;
        }

        if matches!(self.catalog, CatalogState::Loading) {
            ui.label(RichText::new("Loading products...").color(self.theme.text_muted));
            ui.add_space(grid_height - 30.0);
            return;
        }

        ScrollArea::vertical()
            .id_salt("product_grid")
            .max_height(grid_height)
            .show(ui, |ui| {
                if self.visible.is_empty() {
                    ui.label(
                        RichText::new("No products in this category")
                            .color(self.theme.text_muted),
                    );
                    return;
                }

                let visible = self.visible.clone();
                let mut toggled: Option<Product> = None;
                ui.horizontal_wrapped(|ui| {
                    for product in &visible {
                        if self.render_product_card(ui, product) {
                            toggled = Some(product.clone());
                        }
                    }
                });
                if let Some(product) = toggled {
                    self.toggle_product(&product);
                }
            });
    }

    fn render_center_panel(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("Products");
            ui.separator();
            self.render_grid(ui);

            ui.separator();
            ui.heading("Routine & Chat");
            let chat_height = (ui.available_height() - 150.0).max(120.0);
            ScrollArea::vertical()
                .id_salt("chat_log")
                .max_height(chat_height)
                .stick_to_bottom(true)
                .show(ui, |ui| {
                    if self.chat_log.is_empty() {
                        ui.label(
                            RichText::new(
                                "Generate a routine or ask a question to get started.",
                            )
                            .color(self.theme.text_muted),
                        );
                    }

                    for entry in self.chat_log.entries() {
                        match entry {
                            ChatEntry::Routine(routine) => {
                                self.theme.card_frame().show(ui, |ui| {
                                    ui.label(RichText::new(&routine.heading).strong());
                                    ui.add_space(self.theme.spacing_4);
                                    for step in &routine.steps {
                                        ui.label(format!("• {step}"));
                                    }
                                    ui.add_space(self.theme.spacing_4);
                                    ui.label(
                                        RichText::new(&routine.disclaimer)
                                            .color(self.theme.text_muted)
                                            .size(12.0),
                                    );
                                });
                            }
                            ChatEntry::User(text) => {
                                ui.label(format!("[You] {text}"));
                            }
                            ChatEntry::Assistant(text) => {
                                ui.label(format!("[Petal] {text}"));
                            }
                        }
                    }

                    if self.scroll_to_bottom {
                        ui.scroll_to_cursor(Some(egui::Align::BOTTOM));
                    }
                });
            self.scroll_to_bottom = false;

            egui::CollapsingHeader::new("Diagnostics")
                .default_open(false)
                .show(ui, |ui| {
                    ScrollArea::vertical()
                        .id_salt("diagnostics_log")
                        .max_height(90.0)
                        .stick_to_bottom(true)
                        .show(ui, |ui| {
                            for entry in &self.diagnostics_log {
                                ui.label(entry);
                            }
                        });
                });

            ui.separator();
            let mut send_now = false;
            self.theme.composer_frame().show(ui, |ui| {
                ui.horizontal(|ui| {
                    let input_width = (ui.available_width() - 70.0).max(120.0);
                    let response = ui.add(
                        egui::TextEdit::singleline(&mut self.input_buffer)
                            .desired_width(input_width)
                            .hint_text("Ask a question about your routine..."),
                    );
                    if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                        send_now = true;
                    }

                    let clicked = ui
                        .add_enabled(
                            !self.input_buffer.trim().is_empty(),
                            egui::Button::new("Send"),
                        )
                        .clicked();
                    send_now |= clicked;
                });
            });

            if send_now {
                self.submit_chat();
            }
        });
    }
}

impl eframe::App for PetalApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if !self.theme_applied {
            self.theme.apply_visuals(ctx);
            self.theme_applied = true;
        }

        self.drain_events(ctx);
        if matches!(self.catalog, CatalogState::Loading) {
            ctx.request_repaint_after(Duration::from_millis(150));
        }

        self.render_top_bar(ctx);
        self.render_selection_panel(ctx);
        self.render_center_panel(ctx);
    }
}

#[cfg(test)]
mod tests {
    use super::{CatalogState, PetalApp};
    use crate::assistant::ChatEntry;
    use crate::catalog::fetch::CatalogFetcher;
    use crate::catalog::Product;
    use crate::event::AppEvent;
    use std::path::PathBuf;
    use std::sync::mpsc;

    fn product(id: &str, name: &str, brand: &str, category: &str) -> Product {
        Product {
            id: id.to_string(),
            name: name.to_string(),
            brand: brand.to_string(),
            category: category.to_string(),
            image: String::new(),
        }
    }

    fn test_app() -> (PetalApp, tokio::runtime::Runtime) {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .expect("test runtime should build");
        let (tx, rx) = mpsc::channel();
        let fetcher = CatalogFetcher::new(PathBuf::from("products.json"), tx, runtime.handle().clone());
        (PetalApp::new(rx, fetcher), runtime)
    }

    #[test]
    fn catalog_failure_enters_the_unavailable_state() {
        let (mut app, _runtime) = test_app();
        app.apply_event(AppEvent::CatalogFailed("no such file".to_string()));

        assert!(matches!(app.catalog, CatalogState::Unavailable(_)));
        assert!(app.visible.is_empty());
        assert!(!app.diagnostics_log.is_empty());
    }

    #[test]
    fn startup_renders_the_full_catalog_without_hydration() {
        let (mut app, _runtime) = test_app();
        app.apply_event(AppEvent::CatalogLoaded(vec![
            product("1", "Dew Serum", "Acme", "serum"),
            product("2", "Milk Cleanser", "Lait", "cleanser"),
        ]));

        assert!(app.category.is_none());
        assert_eq!(app.visible.len(), 2);
        assert!(app.selection.is_empty());
    }

    #[test]
    fn choosing_a_category_filters_and_hydrates_only_visible_ids() {
        let (mut app, _runtime) = test_app();
        app.apply_event(AppEvent::CatalogLoaded(vec![
            product("1", "Dew Serum", "Acme", "serum"),
            product("2", "Milk Cleanser", "Lait", "cleanser"),
            product("3", "Night Serum", "Acme", "serum"),
        ]));

        let stored = vec!["3".to_string(), "2".to_string(), "ghost".to_string()];
        app.apply_category("serum".to_string(), &stored);

        let visible_ids: Vec<&str> = app.visible.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(visible_ids, vec!["1", "3"]);
        assert_eq!(app.selection.ids(), vec!["3"]);
        assert_eq!(app.hidden_selection_count, 2);
    }

    #[test]
    fn generating_with_empty_selection_warns_and_leaves_the_chat_untouched() {
        let (mut app, _runtime) = test_app();
        app.generate_routine();

        assert!(app.generate_warning.is_some());
        assert!(app.chat_log.is_empty());
    }

    #[test]
    fn generating_replaces_the_chat_with_the_routine() {
        let (mut app, _runtime) = test_app();
        app.selection
            .add("1".to_string(), "Serum".to_string(), "Acme".to_string());
        app.generate_routine();

        assert!(app.generate_warning.is_none());
        assert_eq!(app.chat_log.entries().len(), 1);
        match &app.chat_log.entries()[0] {
            ChatEntry::Routine(routine) => {
                assert_eq!(routine.steps, vec!["Serum by Acme"]);
            }
            other => panic!("expected a routine entry, got {other:?}"),
        }
    }

    #[test]
    fn chat_submission_appends_two_entries_and_clears_the_input() {
        let (mut app, _runtime) = test_app();
        app.input_buffer = "What should I use first?".to_string();
        app.submit_chat();

        assert_eq!(app.chat_log.entries().len(), 2);
        assert!(matches!(app.chat_log.entries()[0], ChatEntry::User(_)));
        assert!(matches!(app.chat_log.entries()[1], ChatEntry::Assistant(_)));
        assert!(app.input_buffer.is_empty());
    }

    #[test]
    fn blank_chat_input_is_a_silent_no_op() {
        let (mut app, _runtime) = test_app();
        app.input_buffer = "   ".to_string();
        app.submit_chat();

        assert!(app.chat_log.is_empty());
        assert_eq!(app.input_buffer, "   ");
    }
}
