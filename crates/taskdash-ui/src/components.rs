mod charts;
mod dashboard;
mod task_details;
mod task_form;
mod task_list;

pub use dashboard::Dashboard;
pub use task_details::TaskDetails;
pub use task_form::{
  Field,
  TaskFormPanel,
  apply_field
};
pub use task_list::TaskList;
