//! Play groups, their capacity state machine and platform naming.
//!
//! A group starts `Open` and becomes `Full` once `filled == max`. The creator
//! counts as a member but does not occupy a slot.

use chrono::NaiveDate;
use derive_getters::Getters;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;
use vishnu_error::{GroupError, GroupErrorKind, ParseError, ParseErrorKind, VishnuResult};

/// Date format accepted for `groupadd`.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

static GROUP_CHANNEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^group-(\d+)-").expect("group channel pattern is a valid regex")
});

/// Name of the role granted to group members.
pub fn role_name(group_id: i32) -> String {
    format!("group-{}", group_id)
}

/// Name of the group's text channel.
pub fn text_channel_name(group_id: i32) -> String {
    format!("group-{}-text", group_id)
}

/// Name of the group's voice channel.
pub fn voice_channel_name(group_id: i32) -> String {
    format!("group-{}-voice", group_id)
}

/// Recover the group id from a group channel name such as `group-12-text`.
pub fn group_id_from_channel(channel_name: &str) -> Option<i32> {
    GROUP_CHANNEL
        .captures(channel_name)
        .and_then(|c| c[1].parse().ok())
}

/// Whether a group can take more players.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum CapacityState {
    /// At least one slot free
    #[display("OPEN")]
    Open,
    /// Every slot taken
    #[display("FULL")]
    Full,
}

/// Slots taken out of slots available, rendered as `filled/max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Getters)]
pub struct Capacity {
    filled: u32,
    max: u32,
}

impl Capacity {
    /// A capacity with no slots taken.
    pub fn empty(max: u32) -> Self {
        Self { filled: 0, max }
    }

    /// Build from stored values, returning `None` unless `filled <= max`.
    pub fn new(filled: u32, max: u32) -> Option<Self> {
        (filled <= max).then_some(Self { filled, max })
    }

    /// Current state.
    pub fn state(&self) -> CapacityState {
        if self.filled >= self.max {
            CapacityState::Full
        } else {
            CapacityState::Open
        }
    }

    /// True when every slot is taken.
    pub fn is_full(&self) -> bool {
        self.state() == CapacityState::Full
    }
}

impl fmt::Display for Capacity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.filled, self.max)
    }
}

/// A stored play group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct Group {
    id: i32,
    guild_id: i64,
    creator: String,
    start_date: NaiveDate,
    capacity: Capacity,
    notes: Option<String>,
    members: Vec<String>,
}

impl Group {
    /// Assemble a group from stored fields.
    pub fn from_parts(
        id: i32,
        guild_id: i64,
        creator: impl Into<String>,
        start_date: NaiveDate,
        capacity: Capacity,
        notes: Option<String>,
        members: Vec<String>,
    ) -> Self {
        Self {
            id,
            guild_id,
            creator: creator.into(),
            start_date,
            capacity,
            notes,
            members,
        }
    }

    /// True if `who` created the group or has joined it.
    pub fn is_member(&self, who: &str) -> bool {
        self.creator == who || self.members.iter().any(|m| m == who)
    }

    /// Apply a join.
    ///
    /// Membership is checked before capacity, so a member of a full group is
    /// told they already belong to it. On error nothing changes.
    pub fn try_join(&mut self, who: &str) -> Result<(), GroupError> {
        if self.is_member(who) {
            return Err(GroupError::new(GroupErrorKind::AlreadyMember {
                group_id: self.id,
                member: who.to_string(),
            }));
        }

        if self.capacity.is_full() {
            return Err(GroupError::new(GroupErrorKind::Full {
                group_id: self.id,
                filled: self.capacity.filled,
                max: self.capacity.max,
            }));
        }

        self.capacity.filled += 1;
        self.members.push(who.to_string());
        Ok(())
    }

    /// Only the creator may close a group.
    pub fn ensure_owner(&self, caller: &str) -> Result<(), GroupError> {
        if self.creator == caller {
            Ok(())
        } else {
            Err(GroupError::new(GroupErrorKind::NotOwner {
                group_id: self.id,
                caller: caller.to_string(),
            }))
        }
    }
}

/// A validated group that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct NewGroup {
    guild_id: i64,
    creator: String,
    start_date: NaiveDate,
    max_users: u32,
    notes: Option<String>,
}

impl NewGroup {
    /// Validate `groupadd <start_date> <max_users> [notes...]`.
    pub fn parse<S: AsRef<str>>(
        guild_id: i64,
        creator: &str,
        start_date: &str,
        max_users: &str,
        notes: &[S],
    ) -> VishnuResult<Self> {
        let start_date = NaiveDate::parse_from_str(start_date, DATE_FORMAT)
            .map_err(|_| ParseError::new(ParseErrorKind::InvalidDate(start_date.to_string())))?;

        let max: i32 = max_users.parse().map_err(|_| {
            ParseError::new(ParseErrorKind::InvalidInteger {
                field: "max_users".to_string(),
                value: max_users.to_string(),
            })
        })?;

        let max_users = u32::try_from(max)
            .ok()
            .filter(|m| *m >= 1)
            .ok_or_else(|| {
                ParseError::new(ParseErrorKind::OutOfRange {
                    field: "max_users".to_string(),
                    reason: "a group needs at least one slot".to_string(),
                })
            })?;

        let notes: Vec<&str> = notes.iter().map(AsRef::as_ref).collect();
        let notes = (!notes.is_empty()).then(|| notes.join(" "));

        Ok(Self {
            guild_id,
            creator: creator.to_string(),
            start_date,
            max_users,
            notes,
        })
    }

    /// Turn into a stored group once the store has assigned an id.
    pub fn into_group(self, id: i32) -> Group {
        Group {
            id,
            guild_id: self.guild_id,
            creator: self.creator,
            start_date: self.start_date,
            capacity: Capacity::empty(self.max_users),
            notes: self.notes,
            members: Vec::new(),
        }
    }
}
