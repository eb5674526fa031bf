use std::fmt;
use std::ops::{Index, IndexMut};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// The two independent entry streams of a register.
///
/// `User` carries the register's data; `System` carries its self-description
/// (field definitions, the register definition, the custodian). Each
/// partition numbers its entries from 1.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Partition {
    User,
    System,
}

impl Partition {
    /// Both partitions, in log order of precedence.
    pub const ALL: [Partition; 2] = [Partition::User, Partition::System];

    /// The token used on `append-entry` lines.
    pub fn as_str(&self) -> &'static str {
        match self {
            Partition::User => "user",
            Partition::System => "system",
        }
    }
}

impl fmt::Display for Partition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Partition {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Partition::User),
            "system" => Ok(Partition::System),
            other => Err(TypeError::UnknownPartition(other.to_string())),
        }
    }
}

/// One value per partition.
///
/// Structures that exist once per partition (entry logs, record indices,
/// counters) are stored in a `Partitioned<T>` and addressed with
/// `partitioned[partition]` instead of branching on the partition.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Partitioned<T> {
    user: T,
    system: T,
}

impl<T> Index<Partition> for Partitioned<T> {
    type Output = T;

    fn index(&self, partition: Partition) -> &T {
        match partition {
            Partition::User => &self.user,
            Partition::System => &self.system,
        }
    }
}

impl<T> IndexMut<Partition> for Partitioned<T> {
    fn index_mut(&mut self, partition: Partition) -> &mut T {
        match partition {
            Partition::User => &mut self.user,
            Partition::System => &mut self.system,
        }
    }
}
