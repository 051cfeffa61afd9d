use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.0, f)
            }
        }
    };
}

id_newtype!(UserId);
id_newtype!(EmployeeRecordId);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("'{value}' is not a valid {kind}")]
pub struct UnknownOption {
    pub kind: &'static str,
    pub value: String,
}

/// Fixed option set whose wire strings double as display labels.
macro_rules! option_set {
    ($name:ident, $kind:literal, { $($variant:ident => $label:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $label)]
                $variant,
            )+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $label,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.pad(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = UnknownOption;

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                $name::ALL
                    .iter()
                    .copied()
                    .find(|option| option.as_str() == value)
                    .ok_or_else(|| UnknownOption {
                        kind: $kind,
                        value: value.to_string(),
                    })
            }
        }
    };
}

option_set!(Gender, "gender", {
    Male => "Male",
    Female => "Female",
});

option_set!(District, "district", {
    Mumbai => "Mumbai",
    Pune => "Pune",
    Nagpur => "Nagpur",
    Nashik => "Nashik",
    Thane => "Thane",
});

option_set!(Region, "state", {
    Maharashtra => "Maharashtra",
    Gujarat => "Gujarat",
    Rajasthan => "Rajasthan",
    Goa => "Goa",
    Karnataka => "Karnataka",
});

option_set!(Department, "department", {
    Hr => "HR",
    Sales => "Sales",
    Finance => "Finance",
    Engineering => "Engineering",
    Marketing => "Marketing",
});

option_set!(Profile, "profile", {
    Manager => "Manager",
    TeamLead => "Team Lead",
    SeniorDeveloper => "Senior Developer",
    Intern => "Intern",
    Trainee => "Trainee",
});
