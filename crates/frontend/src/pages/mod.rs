pub mod quake_map;
