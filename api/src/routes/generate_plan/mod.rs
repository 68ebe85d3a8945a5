pub mod generate_plan_route;
