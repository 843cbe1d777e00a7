use enumset::enum_set;
use enumset::EnumSet;
use enumset::EnumSetType;

/// The coarse kinds of change an integer domain can undergo.
///
/// Every value that leaves a domain is also recorded in the domain's removal log, tagged with
/// the kind of change that removed it (see [`DeltaMonitor`](crate::monitoring::DeltaMonitor)).
#[derive(Debug, EnumSetType, Hash)]
pub enum IntDomainEvent {
    /// The domain became a single value.
    Assign,
    LowerBound,
    UpperBound,
    /// A value was removed explicitly, which may or may not have moved a bound.
    Removal,
}

impl DomainEvents {
    /// DomainEvents with both lower and upper bound tightening (but not other value removal).
    pub const BOUNDS: DomainEvents = DomainEvents::new(enum_set!(
        IntDomainEvent::LowerBound | IntDomainEvent::UpperBound
    ));
    /// DomainEvents with bound tightening and assigning to a single value.
    pub const BOUNDS_AND_ASSIGN: DomainEvents = DomainEvents::new(enum_set!(
        IntDomainEvent::Assign | IntDomainEvent::LowerBound | IntDomainEvent::UpperBound
    ));
    /// DomainEvents with lower and upper bound tightening, assigning to a single value, and
    /// single value removal.
    pub const ANY_INT: DomainEvents = DomainEvents::new(enum_set!(
        IntDomainEvent::Assign
            | IntDomainEvent::LowerBound
            | IntDomainEvent::UpperBound
            | IntDomainEvent::Removal
    ));
    /// DomainEvents with only lower bound tightening.
    pub const LOWER_BOUND: DomainEvents = DomainEvents::new(enum_set!(IntDomainEvent::LowerBound));
    /// DomainEvents with only upper bound tightening.
    pub const UPPER_BOUND: DomainEvents = DomainEvents::new(enum_set!(IntDomainEvent::UpperBound));
    /// DomainEvents with only assigning to a single value.
    pub const ASSIGN: DomainEvents = DomainEvents::new(enum_set!(IntDomainEvent::Assign));
    /// DomainEvents with only explicit value removal.
    pub const REMOVAL: DomainEvents = DomainEvents::new(enum_set!(IntDomainEvent::Removal));
}

/// A mask of [`IntDomainEvent`]s, used to state the propagation conditions of a subscriber.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct DomainEvents {
    int_events: EnumSet<IntDomainEvent>,
}

impl DomainEvents {
    pub const fn new(int_events: EnumSet<IntDomainEvent>) -> DomainEvents {
        DomainEvents { int_events }
    }

    pub fn get_int_events(&self) -> EnumSet<IntDomainEvent> {
        self.int_events
    }
}
