pub mod bookmark_list;
pub mod color;
pub mod command_bar;
pub mod help;
pub mod input;
pub mod notes_view;
pub mod pomodoro_view;
pub mod settings_view;
pub mod status_bar;
pub mod todo_list;
