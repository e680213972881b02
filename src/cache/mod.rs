pub mod game_cache;
