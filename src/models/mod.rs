pub mod analysis;
pub mod language;
pub mod score;
pub mod skill;
pub mod test_case;
