pub mod layer_control;
pub mod legend;
pub mod map_view;
pub mod quake_popup;
