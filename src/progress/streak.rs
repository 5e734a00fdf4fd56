use chrono::NaiveDate;

use super::data::*;
use crate::tasks::data::Task;

pub fn group_by_date(tasks: impl IntoIterator<Item = Task>) -> TaskHistory {
    let mut history = TaskHistory::new();

    for task in tasks {
        history.entry(task.date).or_insert_with(Vec::new).push(task);
    }

    history
}

/// A day counts only if it has tasks and every one of them is done.
pub fn is_complete_day(tasks: &[Task]) -> bool {
    !tasks.is_empty() && tasks.iter().all(|task| task.completed)
}

fn is_complete(history: &TaskHistory, date: NaiveDate) -> bool {
    history
        .get(&date)
        .map_or(false, |tasks| is_complete_day(tasks))
}

/// Consecutive complete days ending at `today`. An unfinished or empty `today`
/// gives 0 no matter what came before.
pub fn current_streak(history: &TaskHistory, today: NaiveDate) -> u32 {
    let mut streak = 0;
    let mut day = today;

    while is_complete(history, day) {
        streak += 1;
        day = match day.pred_opt() {
            Some(previous) => previous,
            None => break,
        };
    }

    streak
}

/// Longest run of consecutive complete days anywhere in the history.
pub fn longest_streak(history: &TaskHistory) -> u32 {
    let mut longest = 0;
    let mut run = 0;
    let mut previous: Option<NaiveDate> = None;

    for (date, tasks) in history {
        if !is_complete_day(tasks) {
            run = 0;
            previous = None;
            continue;
        }

        run = match previous {
            Some(previous) if previous.succ_opt() == Some(*date) => run + 1,
            _ => 1,
        };
        longest = longest.max(run);
        previous = Some(*date);
    }

    longest
}

pub fn compute_streak(history: &TaskHistory, today: NaiveDate) -> Streak {
    Streak {
        today,
        current: current_streak(history, today),
        longest: longest_streak(history),
    }
}

pub fn garden_for(history: &TaskHistory, date: NaiveDate) -> Garden {
    let tasks = history.get(&date).map(Vec::as_slice).unwrap_or(&[]);

    Garden {
        date,
        flowers: tasks.iter().filter(|task| task.completed).count(),
        total: tasks.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(value: &str) -> NaiveDate {
        NaiveDate::parse_from_str(value, "%Y-%m-%d").unwrap()
    }

    fn history(days: Vec<(&str, Vec<bool>)>) -> TaskHistory {
        let mut id = 0;
        let mut tasks = vec![];

        for (date, flags) in days {
            for completed in flags.iter() {
                id += 1;
                tasks.push(Task {
                    id,
                    user_id: 1,
                    date: day(date),
                    description: format!("task {}", id),
                    completed: *completed,
                });
            }
        }

        group_by_date(tasks)
    }

    #[test]
    fn broken_chain_in_the_middle() {
        let history = history(vec![
            ("2024-01-01", vec![true]),
            ("2024-01-02", vec![true, false]),
            ("2024-01-03", vec![true]),
        ]);

        let streak = compute_streak(&history, day("2024-01-03"));
        assert_eq!(streak.current, 1);
        assert_eq!(streak.longest, 1);
    }

    #[test]
    fn three_contiguous_complete_days() {
        let history = history(vec![
            ("2024-01-01", vec![true]),
            ("2024-01-02", vec![true]),
            ("2024-01-03", vec![true]),
        ]);

        let streak = compute_streak(&history, day("2024-01-03"));
        assert_eq!(streak.current, 3);
        assert_eq!(streak.longest, 3);
    }

    #[test]
    fn empty_history_has_no_streak() {
        let streak = compute_streak(&TaskHistory::new(), day("2024-01-03"));
        assert_eq!(streak.current, 0);
        assert_eq!(streak.longest, 0);
    }

    #[test]
    fn unfinished_today_resets_current_but_not_longest() {
        let history = history(vec![
            ("2024-01-01", vec![true]),
            ("2024-01-02", vec![true]),
            ("2024-01-03", vec![false, true]),
        ]);

        let streak = compute_streak(&history, day("2024-01-03"));
        assert_eq!(streak.current, 0);
        assert_eq!(streak.longest, 2);
    }

    #[test]
    fn taskless_today_resets_current() {
        let history = history(vec![("2024-01-01", vec![true]), ("2024-01-02", vec![true])]);

        assert_eq!(current_streak(&history, day("2024-01-03")), 0);
        assert_eq!(longest_streak(&history), 2);
    }

    #[test]
    fn gaps_end_a_run_like_incomplete_days() {
        let history = history(vec![
            ("2024-01-01", vec![true]),
            ("2024-01-02", vec![true]),
            ("2024-01-04", vec![true]),
            ("2024-01-05", vec![true]),
            ("2024-01-06", vec![true]),
        ]);

        let streak = compute_streak(&history, day("2024-01-06"));
        assert_eq!(streak.current, 3);
        assert_eq!(streak.longest, 3);
    }

    #[test]
    fn longest_run_can_be_in_the_past() {
        let history = history(vec![
            ("2023-12-30", vec![true]),
            ("2023-12-31", vec![true, true]),
            ("2024-01-01", vec![true]),
            ("2024-01-02", vec![false]),
            ("2024-01-10", vec![true]),
        ]);

        let streak = compute_streak(&history, day("2024-01-10"));
        assert_eq!(streak.current, 1);
        assert_eq!(streak.longest, 3);
    }

    #[test]
    fn garden_counts_completed_tasks_of_the_day() {
        let history = history(vec![
            ("2024-01-01", vec![true, false, true]),
            ("2024-01-02", vec![true]),
        ]);

        let garden = garden_for(&history, day("2024-01-01"));
        assert_eq!(garden.flowers, 2);
        assert_eq!(garden.total, 3);

        let empty = garden_for(&history, day("2024-02-01"));
        assert_eq!(empty.flowers, 0);
        assert_eq!(empty.total, 0);
    }
}
