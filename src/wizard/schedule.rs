//! Visit frequencies, slot selectors and scheduled assignments.

use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

use super::draft::CustomerSelection;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Frequency {
    #[default]
    Daily,
    Weekly,
    Multiple,
    Monthly,
    Fortnightly,
}

impl Frequency {
    fn uses_week_and_day(self) -> bool {
        matches!(self, Frequency::Weekly | Frequency::Multiple)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum Week {
    #[default]
    #[serde(rename = "Week 1")]
    Week1,
    #[serde(rename = "Week 2")]
    Week2,
    #[serde(rename = "Week 3")]
    Week3,
    #[serde(rename = "Week 4")]
    Week4,
    #[serde(rename = "Week 5")]
    Week5,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum Day {
    #[default]
    Mon,
    Tue,
    Wed,
    Thu,
    Fri,
    Sat,
    Sun,
}

/// Day of month, `1..=31`. Travels as a string (`"1"`..`"31"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MonthDay(u8);

impl MonthDay {
    pub fn new(day: u8) -> Option<Self> {
        (1..=31).contains(&day).then_some(MonthDay(day))
    }
}

impl Default for MonthDay {
    fn default() -> Self {
        MonthDay(1)
    }
}

impl fmt::Display for MonthDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for MonthDay {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value
            .trim()
            .parse::<u8>()
            .ok()
            .and_then(MonthDay::new)
            .ok_or_else(|| format!("invalid day of month: {:?}", value))
    }
}

impl From<MonthDay> for String {
    fn from(day: MonthDay) -> Self {
        day.to_string()
    }
}

/// The slot an assignment occupies. Which variant applies is fixed by the
/// frequency: weekly/multiple use a week and weekday, monthly a day of month,
/// daily/fortnightly nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    Unslotted,
    WeekDay { week: Week, day: Day },
    MonthDay(MonthDay),
}

/// Current values of the week/day/day-of-month pickers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotSelector {
    pub week: Week,
    pub day: Day,
    pub month_day: MonthDay,
}

impl SlotSelector {
    pub fn slot_for(&self, frequency: Frequency) -> Slot {
        match frequency {
            f if f.uses_week_and_day() => Slot::WeekDay {
                week: self.week,
                day: self.day,
            },
            Frequency::Monthly => Slot::MonthDay(self.month_day),
            _ => Slot::Unslotted,
        }
    }
}

/// A customer placed on the visit schedule at one frequency slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(into = "AssignmentRecord")]
pub struct ScheduledAssignment {
    pub id: String,
    pub name: String,
    pub code: String,
    pub frequency: Frequency,
    pub slot: Slot,
}

impl ScheduledAssignment {
    pub fn new(customer: &CustomerSelection, frequency: Frequency, selector: &SlotSelector) -> Self {
        Self {
            id: customer.id.clone(),
            name: customer.name.clone(),
            code: customer.store_code().to_string(),
            frequency,
            slot: selector.slot_for(frequency),
        }
    }

    /// Two assignments collide when customer, frequency and slot all match.
    pub fn same_slot(&self, other: &ScheduledAssignment) -> bool {
        self.id == other.id && self.frequency == other.frequency && self.slot == other.slot
    }

    /// Whether this assignment is listed under the given picker state.
    pub fn matches_selection(&self, frequency: Frequency, selector: &SlotSelector) -> bool {
        if self.frequency != frequency {
            return false;
        }
        match (frequency, self.slot) {
            (f, Slot::WeekDay { week, day }) if f.uses_week_and_day() => {
                week == selector.week && day == selector.day
            }
            (Frequency::Monthly, Slot::MonthDay(month_day)) => month_day == selector.month_day,
            (Frequency::Daily | Frequency::Fortnightly, _) => true,
            _ => false,
        }
    }
}

/// Wire shape with the slot flattened into optional fields.
#[derive(Debug, Clone, Serialize)]
pub struct AssignmentRecord {
    pub id: String,
    pub name: String,
    pub code: String,
    pub frequency: Frequency,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub week: Option<Week>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub day: Option<Day>,
    #[serde(rename = "monthDay", skip_serializing_if = "Option::is_none")]
    pub month_day: Option<MonthDay>,
}

impl From<ScheduledAssignment> for AssignmentRecord {
    fn from(a: ScheduledAssignment) -> Self {
        let (week, day, month_day) = match a.slot {
            Slot::Unslotted => (None, None, None),
            Slot::WeekDay { week, day } => (Some(week), Some(day), None),
            Slot::MonthDay(month_day) => (None, None, Some(month_day)),
        };
        Self {
            id: a.id,
            name: a.name,
            code: a.code,
            frequency: a.frequency,
            week,
            day,
            month_day,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn customer(id: &str) -> CustomerSelection {
        CustomerSelection {
            id: id.to_string(),
            name: "Corner Shop".to_string(),
            address: String::new(),
            contact: String::new(),
            visit_time: String::new(),
            frequency: None,
        }
    }

    fn selector(week: Week, day: Day, month_day: u8) -> SlotSelector {
        SlotSelector {
            week,
            day,
            month_day: MonthDay::new(month_day).unwrap(),
        }
    }

    #[test]
    fn slot_fields_follow_frequency() {
        let sel = selector(Week::Week3, Day::Fri, 15);

        assert_eq!(sel.slot_for(Frequency::Daily), Slot::Unslotted);
        assert_eq!(sel.slot_for(Frequency::Fortnightly), Slot::Unslotted);
        assert_eq!(
            sel.slot_for(Frequency::Weekly),
            Slot::WeekDay { week: Week::Week3, day: Day::Fri }
        );
        assert_eq!(
            sel.slot_for(Frequency::Multiple),
            Slot::WeekDay { week: Week::Week3, day: Day::Fri }
        );
        assert_eq!(sel.slot_for(Frequency::Monthly), Slot::MonthDay(MonthDay::new(15).unwrap()));
    }

    #[test]
    fn only_relevant_slot_fields_are_serialized() {
        let sel = selector(Week::Week2, Day::Tue, 9);
        let c = customer("store_S42_1700000000000");

        let weekly = serde_json::to_value(ScheduledAssignment::new(&c, Frequency::Weekly, &sel)).unwrap();
        assert_eq!(
            weekly,
            json!({
                "id": "store_S42_1700000000000",
                "name": "Corner Shop",
                "code": "S42",
                "frequency": "weekly",
                "week": "Week 2",
                "day": "Tue"
            })
        );

        let monthly = serde_json::to_value(ScheduledAssignment::new(&c, Frequency::Monthly, &sel)).unwrap();
        assert_eq!(monthly["monthDay"], "9");
        assert!(monthly.get("week").is_none());
        assert!(monthly.get("day").is_none());

        let daily = serde_json::to_value(ScheduledAssignment::new(&c, Frequency::Daily, &sel)).unwrap();
        assert!(daily.get("week").is_none());
        assert!(daily.get("monthDay").is_none());
    }

    #[test]
    fn same_slot_ignores_name_and_code() {
        let sel = selector(Week::Week1, Day::Mon, 1);
        let a = ScheduledAssignment::new(&customer("store_A_1"), Frequency::Weekly, &sel);
        let mut b = a.clone();
        b.name = "Renamed".to_string();
        assert!(a.same_slot(&b));

        let other_day = selector(Week::Week1, Day::Tue, 1);
        let c = ScheduledAssignment::new(&customer("store_A_1"), Frequency::Weekly, &other_day);
        assert!(!a.same_slot(&c));
    }

    #[test]
    fn month_day_rejects_out_of_range_values() {
        assert!(MonthDay::new(0).is_none());
        assert!(MonthDay::new(32).is_none());
        assert!(serde_json::from_value::<MonthDay>(json!("31")).is_ok());
        assert!(serde_json::from_value::<MonthDay>(json!("32")).is_err());
    }

    #[test]
    fn current_selection_matches_by_frequency_and_slot() {
        let sel = selector(Week::Week1, Day::Mon, 5);
        let weekly = ScheduledAssignment::new(&customer("store_A_1"), Frequency::Weekly, &sel);
        let fortnightly = ScheduledAssignment::new(&customer("store_A_1"), Frequency::Fortnightly, &sel);

        assert!(weekly.matches_selection(Frequency::Weekly, &sel));
        assert!(!weekly.matches_selection(Frequency::Weekly, &selector(Week::Week2, Day::Mon, 5)));
        assert!(!weekly.matches_selection(Frequency::Multiple, &sel));
        assert!(fortnightly.matches_selection(Frequency::Fortnightly, &selector(Week::Week4, Day::Sun, 30)));
    }
}
