use soroban_sdk::contracterror;

pub type MeridianResult<T = ()> = core::result::Result<T, ErrorCode>;

/// Failure classes every `ErrorCode` belongs to.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ErrorKind {
    Authorization,
    InvalidParameter,
    StateConflict,
    MonotonicityViolation,
    ArithmeticPrecondition,
}

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum ErrorCode {
    // authorization
    NotAuthorized = 1,
    AdminNotSet = 2,

    // invalid parameters
    ZeroReward = 100,
    ZeroDuration = 101,
    StartTimeInPast = 102,
    StartTimeTooFarInFuture = 103,
    DurationTooLong = 104,
    InvalidTickBounds = 105,
    LockTimeTooLong = 106,
    PoolMismatch = 107,
    TickRangeMismatch = 108,
    ZeroLiquidity = 109,
    InvalidIndexRange = 110,
    InvalidChunkSize = 111,

    // state conflicts
    AlreadyInitialized = 200,
    IncentiveAlreadyExists = 201,
    IncentiveNotFound = 202,
    InvalidPeriodId = 203,
    IncentiveNotActive = 204,
    IncentiveStillActive = 205,
    IncentiveHasStakes = 206,
    NoRefundAvailable = 207,
    PeriodPending = 208,
    DepositAlreadyExists = 209,
    DepositNotFound = 210,
    DepositHasStakes = 211,
    NotDepositOwner = 212,
    StakeAlreadyExists = 213,
    StakeNotFound = 214,
    TokenLocked = 215,
    AlreadyInSet = 216,
    NotInSet = 217,
    StakedTokenNotFound = 218,
    NotInitialized = 219,

    // monotonicity
    UpdateTimestampNotInPast = 300,
    UpdateTimestampNotAfterLastUpdate = 301,
    SecondsInsideDecreased = 302,
    NextPeriodMissing = 303,

    // arithmetic
    MathError = 400,
    CastingFailure = 401,
    DivisionByZero = 402,
    BnConversionError = 403,
}

impl ErrorCode {
    pub fn kind(&self) -> ErrorKind {
        match *self as u32 {
            0..=99 => ErrorKind::Authorization,
            100..=199 => ErrorKind::InvalidParameter,
            200..=299 => ErrorKind::StateConflict,
            300..=399 => ErrorKind::MonotonicityViolation,
            _ => ErrorKind::ArithmeticPrecondition,
        }
    }
}
