use grain_life::session::{MAX_FPS, MIN_FPS};
use grain_life::{Command, Grid, Session};

/// Menu button plus the optional settings panel.
pub fn draw(ctx: &egui::Context, menu_open: &mut bool, session: &mut Session, grid: &mut Grid) {
    egui::Area::new(egui::Id::new("menu_button_area"))
        .anchor(egui::Align2::LEFT_TOP, egui::vec2(5.0, 5.0))
        .show(ctx, |ui| {
            if ui.button("☰").clicked() {
                *menu_open = !*menu_open;
            }
        });

    if !*menu_open {
        return;
    }

    let panel_frame = egui::Frame {
        fill: egui::Color32::from_rgba_unmultiplied(25, 25, 25, 100),
        ..egui::Frame::side_top_panel(&ctx.style())
    };

    egui::SidePanel::left("side_panel")
        .frame(panel_frame)
        .resizable(true)
        .default_width(200.0)
        .show(ctx, |ui| {
            ui.heading("Simulation");
            ui.separator();
            ui.label(format!("Generation: {}", grid.generation()));
            ui.label(format!("Live Cells: {}", grid.population()));
            ui.label(format!("Grid: {}x{} ({} px cells)", grid.x_cells(), grid.y_cells(), grid.cell_size()));

            ui.separator();
            ui.add(egui::Slider::new(&mut session.fps, MIN_FPS..=MAX_FPS).text("Generations/s"));
            ui.add_enabled(session.started, egui::Checkbox::new(&mut session.paused, "Paused (P)"));
            ui.checkbox(&mut session.stochastic, "Stochastic births (R)");
            ui.checkbox(&mut session.colour_cycle, "Cycle colours (C)");

            ui.separator();
            let label = if session.started { "Re-seed (Space)" } else { "Start (Space)" };
            if ui.button(label).clicked() {
                session.apply(Command::StartOrReseed, grid);
            }
        });
}
