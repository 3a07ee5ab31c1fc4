pub mod admin;
pub mod health;
pub mod music_selections;
pub mod shows;
