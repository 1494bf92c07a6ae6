pub(crate) mod brief_controller;
pub(crate) mod health_check_controller;
