use chrono::{Datelike, Duration, Months, NaiveDate};
use crossterm::event::KeyCode;

#[derive(Clone, Copy, PartialEq, Debug)]
pub enum DatePart {
    Year,
    Month,
    Day,
}

impl DatePart {
    fn digits(self) -> usize {
        match self {
            DatePart::Year => 4,
            DatePart::Month | DatePart::Day => 2,
        }
    }
}

/// A date field edited part by part: type digits or step with Up/Down.
pub struct DateInputState {
    pub date: NaiveDate,
    pub editing: bool,
    pub date_part: DatePart,
    pub current_date_input: String,
}

impl DateInputState {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            editing: false,
            date_part: DatePart::Day,
            current_date_input: String::new(),
        }
    }

    pub fn toggle_editing(&mut self) {
        self.editing = !self.editing;
        self.date_part = DatePart::Day;
        self.current_date_input.clear();
    }

    pub fn next_date_part(&mut self) {
        self.date_part = match self.date_part {
            DatePart::Day => DatePart::Month,
            DatePart::Month => DatePart::Year,
            DatePart::Year => DatePart::Day,
        };
        self.current_date_input.clear();
    }

    pub fn previous_date_part(&mut self) {
        self.date_part = match self.date_part {
            DatePart::Day => DatePart::Year,
            DatePart::Month => DatePart::Day,
            DatePart::Year => DatePart::Month,
        };
        self.current_date_input.clear();
    }

    pub fn handle_input(&mut self, key: KeyCode) {
        if !self.editing {
            return;
        }

        match key {
            KeyCode::Char(c) if c.is_ascii_digit() => {
                self.current_date_input.push(c);
                if self.current_date_input.len() == self.date_part.digits() {
                    if let Ok(value) = self.current_date_input.parse::<u32>() {
                        if let Some(date) = self.with_part(value) {
                            self.date = date;
                        }
                    }
                    self.current_date_input.clear();
                }
            }
            KeyCode::Backspace => {
                self.current_date_input.pop();
            }
            KeyCode::Up => self.step(1),
            KeyCode::Down => self.step(-1),
            KeyCode::Right => self.next_date_part(),
            KeyCode::Left => self.previous_date_part(),
            _ => {}
        }
    }

    /// The current date with the selected part replaced, if that makes a valid date.
    fn with_part(&self, value: u32) -> Option<NaiveDate> {
        let (year, month, day) = (self.date.year(), self.date.month(), self.date.day());
        match self.date_part {
            DatePart::Year if (1900..=2100).contains(&value) => {
                NaiveDate::from_ymd_opt(value as i32, month, day)
            }
            DatePart::Month => NaiveDate::from_ymd_opt(year, value, day),
            DatePart::Day => NaiveDate::from_ymd_opt(year, month, value),
            DatePart::Year => None,
        }
    }

    fn step(&mut self, delta: i32) {
        let stepped = match self.date_part {
            DatePart::Day => self.date.checked_add_signed(Duration::days(delta as i64)),
            DatePart::Month if delta >= 0 => self.date.checked_add_months(Months::new(delta as u32)),
            DatePart::Month => self.date.checked_sub_months(Months::new(delta.unsigned_abs())),
            DatePart::Year if delta >= 0 => self.date.checked_add_months(Months::new(12 * delta as u32)),
            DatePart::Year => self.date.checked_sub_months(Months::new(12 * delta.unsigned_abs())),
        };
        if let Some(date) = stepped {
            self.date = date;
        }
    }

    /// `dd.mm.yyyy`, with the part being edited bracketed.
    pub fn get_display_string(&self) -> String {
        let day = format!("{:02}", self.date.day());
        let month = format!("{:02}", self.date.month());
        let year = format!("{:04}", self.date.year());
        if !self.editing {
            return format!("{}.{}.{}", day, month, year);
        }

        let mark = |part: DatePart, text: String| {
            if part != self.date_part {
                text
            } else if self.current_date_input.is_empty() {
                format!("[{}]", text)
            } else {
                format!("[{}]", self.current_date_input)
            }
        };
        format!(
            "{}.{}.{}",
            mark(DatePart::Day, day),
            mark(DatePart::Month, month),
            mark(DatePart::Year, year)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn editing(date: NaiveDate) -> DateInputState {
        let mut state = DateInputState::new(date);
        state.toggle_editing();
        state
    }

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn typed_digits_replace_the_selected_part() {
        let mut state = editing(ymd(2026, 3, 15));
        state.handle_input(KeyCode::Char('0'));
        assert_eq!(state.get_display_string(), "[0].03.2026");
        state.handle_input(KeyCode::Char('7'));
        assert_eq!(state.date, ymd(2026, 3, 7));

        state.handle_input(KeyCode::Right);
        state.handle_input(KeyCode::Char('1'));
        state.handle_input(KeyCode::Char('2'));
        state.handle_input(KeyCode::Right);
        for c in "2025".chars() {
            state.handle_input(KeyCode::Char(c));
        }
        assert_eq!(state.date, ymd(2025, 12, 7));
    }

    #[test]
    fn invalid_values_are_ignored() {
        let mut state = editing(ymd(2026, 2, 10));
        state.handle_input(KeyCode::Char('3'));
        state.handle_input(KeyCode::Char('1'));
        assert_eq!(state.date, ymd(2026, 2, 10));
        assert!(state.current_date_input.is_empty());
    }

    #[test]
    fn arrows_step_the_selected_part() {
        let mut state = editing(ymd(2026, 1, 31));
        state.handle_input(KeyCode::Up);
        assert_eq!(state.date, ymd(2026, 2, 1));
        state.handle_input(KeyCode::Down);
        state.handle_input(KeyCode::Right);
        state.handle_input(KeyCode::Up);
        assert_eq!(state.date, ymd(2026, 2, 28));
        state.handle_input(KeyCode::Right);
        state.handle_input(KeyCode::Down);
        assert_eq!(state.date, ymd(2025, 2, 28));
    }

    #[test]
    fn input_is_ignored_when_not_editing() {
        let mut state = DateInputState::new(ymd(2026, 1, 1));
        state.handle_input(KeyCode::Up);
        assert_eq!(state.date, ymd(2026, 1, 1));
        assert_eq!(state.get_display_string(), "01.01.2026");
    }
}
