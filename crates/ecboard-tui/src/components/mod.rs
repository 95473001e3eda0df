pub mod candidate_grid;
pub mod header;
pub mod sidebar;

pub use candidate_grid::CandidateGrid;
pub use header::Header;
pub use sidebar::Sidebar;
