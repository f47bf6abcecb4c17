//! Tasks Module
//!
//! Read-through loading of the task list: cache first, database on miss.

mod read_through;


pub use read_through::load_tasks;
