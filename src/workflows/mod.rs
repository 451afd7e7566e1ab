pub mod roster;
pub mod seating;
