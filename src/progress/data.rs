use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use std::collections::BTreeMap;

use crate::tasks::data::Task;

/// A user's tasks grouped by day. Days without any task are simply absent.
pub type TaskHistory = BTreeMap<NaiveDate, Vec<Task>>;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Streak {
    pub today: NaiveDate,
    pub current: u32,
    pub longest: u32,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Garden {
    pub date: NaiveDate,
    pub flowers: usize,
    pub total: usize,
}
