pub mod ask_form;
pub mod questions_list;
