pub mod demo;
pub mod rank;
pub mod run;
