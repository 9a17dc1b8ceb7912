pub mod theme_seed;
