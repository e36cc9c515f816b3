pub mod check;
pub mod tabulate;
