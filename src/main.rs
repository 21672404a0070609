use std::path::PathBuf;

use macroquad::prelude::*;
use life_recorder::{
    application::{Command, ConfigOptions, Simulation, SimulationConfig},
    domain::presets,
    export::FfmpegEncoder,
    input,
    rendering::{self, ScreenRenderer},
    ui,
};

fn window_conf() -> Conf {
    Conf {
        window_title: "Conway's Game of Life - Recorder".to_owned(),
        window_width: 900,
        window_height: 720,
        window_resizable: true,
        ..Default::default()
    }
}

/// Load options from the YAML file given as first argument, if any
fn load_config() -> SimulationConfig {
    let options = match std::env::args().nth(1).map(PathBuf::from) {
        Some(path) => ConfigOptions::load(&path).unwrap_or_else(|e| {
            log::error!("{}; using default configuration", e);
            ConfigOptions::default()
        }),
        None => ConfigOptions::default(),
    };
    SimulationConfig::from_options(options)
}

#[macroquad::main(window_conf)]
async fn main() {
    env_logger::init();

    let config = load_config();
    let mut sim = match Simulation::new(config, ScreenRenderer::default(), Box::new(FfmpegEncoder::new())) {
        Ok(sim) => sim,
        Err(e) => {
            log::error!("Failed to prepare frame export: {}", e);
            return;
        }
    };

    let patterns = presets::all_patterns();
    let mut pending_pattern: Option<usize> = None;
    let mut status = String::from("Ready");

    loop {
        let mouse_pos = mouse_position();
        let buttons = ui::create_buttons();
        let running = sim.is_running();

        let mut commands = input::process_button_clicks(&buttons, mouse_pos, running);
        commands.extend(input::process_keyboard_input(running));

        // Pattern placement mode replaces cell toggling until placed or cancelled
        if let Some(idx) = input::pattern_key_pressed() {
            if !running {
                pending_pattern = Some(idx);
                status = format!("Placing {} ({})", patterns[idx].name, patterns[idx].description);
            }
        }
        match pending_pattern {
            Some(_) if input::cancel_pressed() => {
                pending_pattern = None;
                status = String::from("Placement cancelled");
            }
            Some(idx) => {
                if let Some((row, col)) = input::clicked_cell(sim.grid(), mouse_pos) {
                    sim.place_pattern(&patterns[idx], row, col);
                    pending_pattern = None;
                    status = format!("Placed {}", patterns[idx].name);
                }
            }
            None => commands.extend(input::process_mouse_toggle(sim.grid(), mouse_pos)),
        }

        for command in commands {
            if command == Command::Start {
                pending_pattern = None;
            }
            match sim.handle(command) {
                Ok(()) if command == Command::Export => {
                    status = format!("Exported {}.mp4", sim.config().filename());
                }
                Ok(()) => {}
                Err(e) => {
                    log::warn!("{:?} failed: {}", command, e);
                    status = e.to_string();
                }
            }
        }

        if let Some(outcome) = sim.advance(get_frame_time()) {
            log::debug!("Tick: {:?}", outcome);
        }

        clear_background(BLACK);
        rendering::draw_grid(sim.grid(), sim.renderer().label());
        if let Some(idx) = pending_pattern {
            rendering::draw_pattern_preview(&patterns[idx], sim.grid(), mouse_pos);
        }
        rendering::draw_controls(&sim, &buttons, mouse_pos, &status);

        next_frame().await;
    }
}
