use serde::{Deserialize, Serialize};

use super::InvalidEnum;

/// Macro to generate enum with as_str + std::str::FromStr pattern
macro_rules! str_enum {
    ($name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = InvalidEnum;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(InvalidEnum {
                        field: stringify!($name).into(),
                        value: s.into(),
                    }),
                }
            }
        }
    };
}

str_enum!(TaskType {
    SimpleExtraction => "simple_extraction",
    Classification => "classification",
    Summarization => "summarization",
    ComplexAnalysis => "complex_analysis",
    MultiStepReasoning => "multi_step_reasoning",
    GeneralChat => "general_chat",
});

str_enum!(BudgetMode {
    Premium => "premium",
    Balanced => "balanced",
    Economy => "economy",
});

str_enum!(TriggerType {
    Immediate => "immediate",
    Date => "date",
    Event => "event",
});

str_enum!(DeadlineKind {
    Absolute => "absolute",
    Relative => "relative",
    Recurring => "recurring",
});

str_enum!(ObligationStatus {
    Pending => "pending",
    InProgress => "in_progress",
    Completed => "completed",
    Cancelled => "cancelled",
});

str_enum!(DeadlineStatus {
    Active => "active",
    Completed => "completed",
    Expired => "expired",
    Cancelled => "cancelled",
});

str_enum!(TaskStatus {
    Pending => "pending",
    InProgress => "in_progress",
    Completed => "completed",
    Cancelled => "cancelled",
});

str_enum!(LifeDomain {
    Work => "work",
    Finance => "finance",
    Health => "health",
    Legal => "legal",
    Housing => "housing",
    Family => "family",
    Administrative => "administrative",
    Social => "social",
    Other => "other",
});

str_enum!(Importance {
    Low => "low",
    Normal => "normal",
    High => "high",
    Critical => "critical",
});

/// Ordinal complexity estimate for a request. Hand-written (not `str_enum!`)
/// because the ordering matters: Simple < Medium < Complex < VeryComplex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TaskComplexity {
    Simple,
    Medium,
    Complex,
    VeryComplex,
}

impl TaskComplexity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Simple => "simple",
            Self::Medium => "medium",
            Self::Complex => "complex",
            Self::VeryComplex => "very_complex",
        }
    }
}

impl std::str::FromStr for TaskComplexity {
    type Err = InvalidEnum;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "simple" => Ok(Self::Simple),
            "medium" => Ok(Self::Medium),
            "complex" => Ok(Self::Complex),
            "very_complex" => Ok(Self::VeryComplex),
            _ => Err(InvalidEnum {
                field: "TaskComplexity".into(),
                value: s.into(),
            }),
        }
    }
}
