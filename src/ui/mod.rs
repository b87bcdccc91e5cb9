// ============================================================================
// Module : ui
// ============================================================================
// Gère toute l'interface utilisateur (Terminal User Interface)
// ============================================================================

pub mod dashboard; // Rendu de l'interface principale
pub mod details;   // Panneau de détail (grille + graphique)
pub mod events;    // Gestion des événements clavier et souris

// Re-exports pour simplifier les imports
pub use dashboard::render;
pub use events::{Event, EventHandler};
