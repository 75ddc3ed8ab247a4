pub mod models;
pub mod present;
pub mod store;
pub mod task_edit;
pub mod task_list;
pub mod ui;
pub mod view;
