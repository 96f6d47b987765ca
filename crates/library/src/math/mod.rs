pub mod casting;
pub mod safe_math;
pub mod yield_rate;
