//! Heads-up display: status bar and the collision equations sidebar

use collision_sim::{RestitutionRule, StepReport};
use egui::{Color32, Context, RichText};
use glam::Vec2;

/// Frame statistics shown in the status bar
pub struct HudStats<'a> {
    pub fps: f32,
    pub visible: u32,
    pub total: usize,
    pub mouse_world: Vec2,
    pub zoom: f32,
    pub paused: bool,
    pub gravity: Vec2,
    /// Occupied grid cells and total cell memberships after the last rebuild
    pub cells: usize,
    pub memberships: usize,
    pub report: &'a StepReport,
}

/// Draw the top status bar
pub fn draw_status(ctx: &Context, stats: &HudStats<'_>) {
    egui::TopBottomPanel::top("status").show(ctx, |ui| {
        ui.horizontal(|ui| {
            ui.label(format!("FPS: {:.0}", stats.fps));
            ui.separator();
            ui.label(format!("Dots: {}/{}", stats.visible, stats.total));
            ui.separator();
            ui.label(format!(
                "Mouse: ({:.0}, {:.0})",
                stats.mouse_world.x, stats.mouse_world.y
            ));
            ui.separator();
            ui.label(format!("Zoom: {:.2}x", stats.zoom));
            ui.separator();
            ui.label(format!("g: {:.1}", stats.gravity.length()));
            ui.separator();
            ui.label(format!("Cells: {} ({} entries)", stats.cells, stats.memberships));
            ui.separator();
            ui.label(format!(
                "Contacts: {} / {} candidates",
                stats.report.contacts, stats.report.candidates
            ));
            ui.separator();
            if stats.paused {
                ui.label(RichText::new("PAUSED").color(Color32::YELLOW));
            } else {
                ui.label(RichText::new("RUNNING").color(Color32::GREEN));
            }
            if stats.report.dropped_time > 0.0 {
                ui.separator();
                ui.label(RichText::new("FALLING BEHIND").color(Color32::LIGHT_RED));
            }
        });
    });
}

/// An equation with its name and formula
pub struct Equation {
    pub name: &'static str,
    pub formula: &'static str,
    pub description: &'static str,
}

/// Restitution equation for the active combination rule
pub fn restitution_equation(rule: RestitutionRule) -> Equation {
    let formula = match rule {
        RestitutionRule::Min => "e = min(e₁, e₂)",
        RestitutionRule::Max => "e = max(e₁, e₂)",
        RestitutionRule::Average => "e = (e₁ + e₂) / 2",
        RestitutionRule::Product => "e = e₁·e₂",
    };
    Equation {
        name: "Restitution",
        formula,
        description: "1 is perfectly elastic, 0 perfectly inelastic",
    }
}

/// Draw the equations sidebar
pub fn draw_equations_sidebar(
    ctx: &Context,
    rule: RestitutionRule,
    equations: &[Equation],
    variables: &[(&str, &str)],
) {
    let restitution = restitution_equation(rule);
    egui::SidePanel::right("equations_panel")
        .resizable(true)
        .default_width(280.0)
        .show(ctx, |ui| {
            ui.heading(RichText::new("Circle Collisions").color(Color32::LIGHT_BLUE));
            ui.separator();

            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.collapsing(RichText::new("📐 Equations").strong(), |ui| {
                    for eq in equations.iter().chain(std::iter::once(&restitution)) {
                        ui.group(|ui| {
                            ui.label(RichText::new(eq.name).strong().color(Color32::YELLOW));
                            ui.label(RichText::new(eq.formula).monospace().color(Color32::WHITE));
                            ui.label(RichText::new(eq.description).small().italics());
                        });
                        ui.add_space(4.0);
                    }
                });

                ui.add_space(8.0);

                ui.collapsing(RichText::new("📖 Variables").strong(), |ui| {
                    egui::Grid::new("variables_grid")
                        .num_columns(2)
                        .spacing([10.0, 4.0])
                        .show(ui, |ui| {
                            for (symbol, meaning) in variables {
                                ui.label(RichText::new(*symbol).monospace().color(Color32::LIGHT_GREEN));
                                ui.label(*meaning);
                                ui.end_row();
                            }
                        });
                });

                ui.add_space(8.0);

                ui.collapsing(RichText::new("🎮 Controls").strong(), |ui| {
                    for (key, action) in CONTROLS {
                        ui.horizontal(|ui| {
                            ui.label(RichText::new(*key).monospace().color(Color32::LIGHT_GREEN));
                            ui.label(*action);
                        });
                    }
                });
            });
        });
}

const CONTROLS: &[(&str, &str)] = &[
    ("E / Space", "Pause / resume"),
    ("N", "Single step while paused"),
    ("R", "Reset bodies"),
    ("H", "Toggle this panel"),
    ("WASD / Arrows", "Pan"),
    ("Right drag", "Pan"),
    ("Scroll", "Zoom at cursor"),
    ("Left click", "Spawn a body"),
    ("Esc", "Quit"),
];

pub const COLLISION_EQUATIONS: &[Equation] = &[
    Equation {
        name: "Overlap Test",
        formula: "|p₂ - p₁| < r₁ + r₂",
        description: "Touching circles do not collide",
    },
    Equation {
        name: "Contact Normal",
        formula: "n̂ = (p₂ - p₁) / |p₂ - p₁|",
        description: "Points from the first body to the second",
    },
    Equation {
        name: "Impulse Magnitude",
        formula: "j = -(1 + e)·(v_rel·n̂) / (1/m₁ + 1/m₂)",
        description: "Applied only while the bodies approach",
    },
    Equation {
        name: "Velocity Update",
        formula: "v₁ -= j·n̂/m₁,  v₂ += j·n̂/m₂",
        description: "Conserves momentum",
    },
    Equation {
        name: "Positional Correction",
        formula: "Δp = max(d - slop, 0)·k / (1/m₁ + 1/m₂)·n̂",
        description: "Split by inverse mass to remove overlap",
    },
    Equation {
        name: "Semi-implicit Euler",
        formula: "v += g·Δt,  p += v·Δt",
        description: "Fixed sub-step integration",
    },
];

pub const COLLISION_VARIABLES: &[(&str, &str)] = &[
    ("p, v", "Position and velocity"),
    ("r, m", "Radius and mass"),
    ("n̂", "Contact normal"),
    ("d", "Penetration depth"),
    ("e", "Coefficient of restitution"),
    ("j", "Impulse magnitude"),
    ("k", "Correction fraction"),
    ("g", "Gravity"),
];
