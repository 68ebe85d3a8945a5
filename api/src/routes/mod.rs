pub mod generate_plan;
pub mod home_route;
