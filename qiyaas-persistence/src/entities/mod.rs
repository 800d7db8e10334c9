pub mod prelude;

pub mod played_days;
