pub mod legend;
pub mod mind_map;
pub mod sidebar;
