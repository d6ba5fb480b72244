pub mod beatmap;
pub mod lane;
