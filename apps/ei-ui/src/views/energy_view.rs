use std::ops::Range;

use egui_extras::{Column, TableBuilder};
use ei_app::energy_loader;
use ei_core::format::truncate_with_ellipsis;
use ei_core::{EnergyRecord, LOCATIONS};
use ei_state::{ColumnSet, ErrorNotice, MergeOutcome, PageRequest, PageResponse, RowState, WindowedLoader};

const ROW_HEIGHT: f32 = 28.0;
const TOOLTIP_CHARS: usize = 12;

pub struct EnergyView {
    loader: WindowedLoader<EnergyRecord>,
    columns: ColumnSet,
    show_column_menu: bool,
    started: bool,
}

impl Default for EnergyView {
    fn default() -> Self {
        Self {
            loader: energy_loader(),
            columns: ColumnSet::default(),
            show_column_menu: false,
            started: false,
        }
    }
}

impl EnergyView {
    pub fn loader(&self) -> &WindowedLoader<EnergyRecord> {
        &self.loader
    }

    /// Page 1 request on first use; `None` afterwards.
    pub fn start(&mut self) -> Option<PageRequest> {
        if self.started {
            return None;
        }
        self.started = true;
        self.loader.request_page(ei_core::FIRST_PAGE)
    }

    pub fn on_page(&mut self, response: PageResponse<EnergyRecord>) {
        if let MergeOutcome::Stale { page, generation } = self.loader.complete(response) {
            tracing::debug!(page, generation, "ignored energy page from an old filter");
        }
    }

    /// Draw the view; returns the page fetches it needs.
    pub fn show(&mut self, ui: &mut egui::Ui) -> Vec<PageRequest> {
        let mut requests: Vec<PageRequest> = self.start().into_iter().collect();

        ui.horizontal(|ui| {
            ui.heading("Energy Consumption");
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui.button("Columns").clicked() {
                    self.show_column_menu = !self.show_column_menu;
                }
            });
        });

        ui.horizontal_wrapped(|ui| {
            ui.label("Location:");
            for location in LOCATIONS {
                let active = self.loader.location() == Some(location);
                if ui.selectable_label(active, location).clicked() {
                    requests.extend(self.loader.toggle_location(location));
                }
            }
        });

        if self.show_column_menu {
            self.column_menu(ui);
        }

        ui.horizontal(|ui| {
            let loaded = self.loader.loaded_count();
            match (self.loader.total(), self.loader.progress_percent()) {
                (Some(total), Some(pct)) => {
                    ui.label(format!("Loaded {} of {} records ({}%)", loaded, total, pct));
                }
                _ => {
                    ui.label(format!("Loaded {} records", loaded));
                }
            }
            if self.loader.is_loading() {
                ui.spinner();
            }
        });
        ui.separator();

        let (banner, inline_error) = match self.loader.error_notice() {
            Some(ErrorNotice::Banner(message)) => (Some(message.to_string()), None),
            Some(ErrorNotice::Inline(message)) => (None, Some(message.to_string())),
            None => (None, None),
        };

        if let Some(message) = banner {
            ui.colored_label(
                egui::Color32::RED,
                format!("Failed to load energy data: {}", message),
            );
            if ui.button("Retry").clicked() {
                let retried = self.loader.retry_failed();
                if retried.is_empty() {
                    requests.extend(self.loader.request_page(ei_core::FIRST_PAGE));
                }
                requests.extend(retried);
            }
            self.loader.frame_settled();
            return requests;
        }

        if self.loader.visible_count() == 0 && !self.loader.is_loading() {
            ui.label("No energy records found");
            self.loader.frame_settled();
            return requests;
        }

        let table_height = ui.available_height() - if inline_error.is_some() { 28.0 } else { 0.0 };

        let rendered = self.table(ui, table_height.max(120.0));
        if let Some(range) = rendered {
            requests.extend(self.loader.request_visible(range));
        }
        self.loader.frame_settled();

        if let Some(message) = inline_error {
            ui.horizontal(|ui| {
                ui.colored_label(egui::Color32::RED, format!("Error loading more rows: {}", message));
                if ui.small_button("Retry").clicked() {
                    requests.extend(self.loader.retry_failed());
                }
            });
        }

        requests
    }

    fn column_menu(&mut self, ui: &mut egui::Ui) {
        ui.group(|ui| {
            ui.horizontal_wrapped(|ui| {
                let columns: Vec<_> = self.columns.all().to_vec();
                for column in columns {
                    let mut visible = column.visible;
                    let response = ui.add_enabled(
                        !column.required,
                        egui::Checkbox::new(&mut visible, column.label),
                    );
                    if response.changed() {
                        self.columns.toggle(column.kind);
                    }
                }
                if ui.button("Reset").clicked() {
                    self.columns.reset();
                }
            });
        });
    }

    /// Renders the virtualized table and returns the row range that was drawn.
    fn table(&mut self, ui: &mut egui::Ui, height: f32) -> Option<Range<usize>> {
        let visible: Vec<_> = self.columns.visible().cloned().collect();
        let row_count = self.loader.visible_count();
        let scroll_to_top = self.loader.take_scroll_to_top();

        let mut builder = TableBuilder::new(ui)
            .striped(true)
            .resizable(true)
            .max_scroll_height(height)
            .cell_layout(egui::Layout::left_to_right(egui::Align::Center));
        for column in &visible {
            builder = builder.column(Column::initial(column.width).at_least(60.0).clip(true));
        }
        if scroll_to_top {
            builder = builder.scroll_to_row(0, Some(egui::Align::TOP));
        }

        let loader = &self.loader;
        let mut first: Option<usize> = None;
        let mut last = 0usize;

        builder
            .header(24.0, |mut header| {
                for column in &visible {
                    header.col(|ui| {
                        ui.strong(column.label);
                    });
                }
            })
            .body(|body| {
                body.rows(ROW_HEIGHT, row_count, |mut row| {
                    let index = row.index();
                    first = Some(first.map_or(index, |f| f.min(index)));
                    last = last.max(index);

                    match loader.row(index) {
                        RowState::Loaded(record) => {
                            for column in &visible {
                                row.col(|ui| {
                                    let text = column.kind.value(record);
                                    if column.kind.has_tooltip() && text.chars().count() > TOOLTIP_CHARS {
                                        ui.label(truncate_with_ellipsis(&text, TOOLTIP_CHARS))
                                            .on_hover_text(text);
                                    } else {
                                        ui.label(text);
                                    }
                                });
                            }
                        }
                        RowState::Loading => {
                            for (i, _) in visible.iter().enumerate() {
                                row.col(|ui| {
                                    if i == 0 {
                                        ui.spinner();
                                        ui.weak("Loading...");
                                    }
                                });
                            }
                        }
                        RowState::Beyond => {
                            for _ in &visible {
                                row.col(|_| {});
                            }
                        }
                    }
                });
            });

        first.map(|f| f..last + 1)
    }
}
