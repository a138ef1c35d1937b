pub mod planner_service;
