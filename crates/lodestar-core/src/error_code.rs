//! Unified error-code namespace.
//!
//! HTTP status codes and the backend's service error codes never overlap, so
//! both live in one enumeration. The client also defines its own codes
//! (140xx) for failures that never reach a server: malformed responses,
//! network errors, invalid arguments.
//!
//! Values are append-only. They are logged and persisted by callers, so an
//! existing discriminant must never be renumbered.

use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Declares the `ErrorCode` enum together with its lookup tables.
///
/// Explicit discriminants make the compiler reject any duplicated value.
macro_rules! error_codes {
    ($( $(#[$meta:meta])* $name:ident = $value:literal, )*) => {
        /// A single identifier for every failure the SDK can report.
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[repr(i32)]
        #[non_exhaustive]
        pub enum ErrorCode {
            $( $(#[$meta])* $name = $value, )*
        }

        impl ErrorCode {
            /// Every defined code, in declaration order.
            pub const ALL: &'static [ErrorCode] = &[ $( ErrorCode::$name, )* ];

            /// Looks up the code with the given numeric value.
            pub fn from_code(code: i64) -> Option<Self> {
                match code {
                    $( $value => Some(Self::$name), )*
                    _ => None,
                }
            }

            /// Variant name, e.g. `"PreconditionFailed"`.
            pub const fn name(self) -> &'static str {
                match self {
                    $( Self::$name => stringify!($name), )*
                }
            }
        }
    };
}

error_codes! {
    /// No error. Never attached to a failure.
    #[default]
    None = 0,

    // HTTP 1xx
    Continue = 100,
    SwitchingProtocols = 101,
    Processing = 102,

    // HTTP 2xx
    Ok = 200,
    Created = 201,
    Accepted = 202,
    NonAuthoritativeInfo = 203,
    NoContent = 204,
    ResetContent = 205,
    PartialContent = 206,
    MultiStatus = 207,
    AlreadyReported = 208,
    ImUsed = 226,

    // HTTP 3xx
    MultipleChoices = 300,
    MovedPermanently = 301,
    Found = 302,
    SeeOther = 303,
    NotModified = 304,
    UseProxy = 305,
    TemporaryRedirect = 307,
    PermanentRedirect = 308,

    // HTTP 4xx
    BadRequest = 400,
    Unauthorized = 401,
    PaymentRequired = 402,
    Forbidden = 403,
    NotFound = 404,
    MethodNotAllowed = 405,
    NotAcceptable = 406,
    ProxyAuthenticationRequired = 407,
    RequestTimeout = 408,
    Conflict = 409,
    Gone = 410,
    LengthRequired = 411,
    PreconditionFailed = 412,
    RequestEntityTooLarge = 413,
    RequestUriTooLong = 414,
    UnsupportedMediaType = 415,
    RequestedRangeNotSatisfiable = 416,
    ExpectationFailed = 417,
    UnprocessableEntity = 422,
    HttpTooManyRequests = 429,

    // HTTP 5xx
    InternalServerError = 500,
    NotImplemented = 501,
    BadGateway = 502,
    ServiceUnavailable = 503,
    GatewayTimeout = 504,
    HttpVersionNotSupported = 505,

    // Global service codes (20000 - 20022)
    UnauthorizedAccess = 20001,
    ValidationError = 20002,
    OptimisticLock = 20006,
    TooManyRequests = 20007,
    UserNotFound = 20008,
    UnknownError = 20009,
    ActionBanned = 20016,
    UserIsNotLinkedToNamespace = 20017,
    UnableToParseRequestBody = 20019,
    TokenIsNotUserToken = 20022,

    // E-commerce
    NamespaceNotFound = 2141,
    UserProfileNotFound = 2241,
    WalletAlreadyExist = 3571,
    StoreNotFound = 30141,
    PublisherStoreNotExist = 30142,
    CategoryNotFound = 30241,
    ItemNotFound = 30341,
    EntitlementNotDistributable = 31121,
    ExceedDistributeQuantity = 31122,
    PublisherNamespaceNotDistributable = 31123,
    EntitlementIdNotFound = 31141,
    EntitlementAppIdNotFound = 31142,
    DistributionReceiverNotFound = 31241,
    DistributionReceiverAlreadyExist = 31271,
    OrderPriceMismatch = 32121,
    OrderNotFound = 32141,
    OrderInvalidStatus = 32172,
    OrderReceiptNotDownloadable = 32173,
    ExceedItemMaxCountPerUser = 32175,
    ExceedItemMaxCount = 32176,
    OrderNotCancelable = 32177,
    WalletExceedMaxTransactionAmountPerDay = 35121,
    WalletExceedMaxAmountPerTransaction = 35122,
    WalletInactive = 35123,
    WalletInsufficientBalance = 35124,
    WalletExceedMaxBalanceAmount = 35125,
    UserWalletDoesNotExist = 35141,
    CurrencyNotFound = 36141,
    CodeNotFound = 37142,
    CampaignInactive = 37172,
    CodeInactive = 37173,
    MaxRedeemCountPerCodeExceeded = 37174,
    MaxRedeemCountPerCodePerUserExceeded = 37175,
    CodeRedeemptionNotStarted = 37177,
    CodeRedeemptionAlreadyEnded = 37178,
    MaxRedeemCountPerCodePerCampaignExceeded = 37179,

    // Leaderboard
    LeaderboardConfigNotFound = 71230,
    LeaderboardRankingUnableToRetrieve = 71233,
    LeaderboardRankingNotFound = 71235,

    // Statistic
    InvalidStatOperator = 12221,
    /// Also reported as "statistic not found"; see [`ErrorCode::STATISTIC_NOT_FOUND`].
    StatisticConfigNotFound = 12241,
    UserStatsNotFound = 12242,
    StatNotDecreasable = 12273,
    UserStatAlreadyExist = 12274,
    StatValueOutOfRange = 12275,

    // Group
    UserNotBelongToAnyGroup = 73034,
    InsufficientMemberRolePermission = 73036,
    UserAccessDifferentGroup = 73037,
    GroupNotFound = 73333,
    UserAlreadyJoinedGroup = 73342,
    UserAlreadyInvited = 73437,
    UserAlreadyRequestedToJoin = 73438,
    GroupAdminCannotLeaveGroup = 73440,
    PrivateGroupIsNotJoinable = 73441,
    UserAlreadyJoinedInAnotherGroup = 73442,
    MemberRequestNotFound = 73443,

    // Client side
    GeneralClientError = 14000,
    ErrorFromException = 14001,
    InvalidArgument = 14002,
    InvalidRequest = 14003,
    /// The response body could not be parsed into the expected shape.
    InvalidResponse = 14004,
    /// No response was obtained from the transport.
    NetworkError = 14005,
    IsNotLoggedIn = 14006,
    UserProfileIsNotCreated = 14007,
    GenerateTokenFailed = 14008,
    AccountIsNotUpgraded = 14009,
    VerificationCodeIsNotRequested = 14010,
    EmailIsNotVerified = 14011,
    EntitlementNotCreated = 14012,
    GenerateAuthCodeFailed = 14013,
    AccessDenied = 14014,
    MessageFieldTypeNotSupported = 14015,
    MessageFormatInvalid = 14016,
    MessageFieldDoesNotExist = 14017,
    MessageFieldConversionFailed = 14018,
    MessageCannotBeSent = 14019,
    MessageTypeNotSupported = 14020,
    CachedTokenNotFound = 14301,
    UnableToSerializeDeserializeCachedToken = 14302,
    CachedTokenExpired = 14303,

    // IAM / basic
    UserUnderage = 10130,
    EmailAlreadyUsed = 10133,
    CountryNotFound = 10154,
    PlatformAlreadyLinked = 10173,
    UserAlreadyExist = 10180,
    UserProfileConflict = 11441,
    InvalidSession = 13132,

    // Session
    SessionInvalidJoinability = 20021,
    SessionLeadershipRequired = 20031,
    SessionJoinNotAllowed = 20032,
    SessionInvalidId = 20034,
    SessionPartyNotFound = 20041,
    SessionIdNotFound = 20042,
    SessionConfigurationNotExist = 20045,
    SessionInvitationExpired = 20047,
    SessionUserInParty = 20048,
    SessionVersionMismatch = 20071,

    // Matchmaking
    MatchmakingRoleBasedEmptyRole = 510401,
    MatchmakingRoleBasedWrongRole = 510402,
    MatchmakingMatchPoolNotFound = 520003,
    MatchmakingTicketNotFound = 520303,

    // Lobby: connection
    LobbyConnectionUnableToUpgrade = 11211,
    LobbyConnectionUnableToRegisterUser = 11212,
    LobbyConnectionMultipleLoginAttempt = 11215,
    LobbyConnectionUnableCheckConnectedUser = 11216,
    LobbyConnectionUnableToValidateSession = 11217,
    LobbyConnectionInvalidSession = 11218,
    // Lobby: party info
    PartyInfoUnableGetUserRegistry = 11221,
    PartyInfoUnableGetUserPartyInfo = 11222,
    PartyInfoSuccessGetUserPartyInfoEmpty = 11223,
    // Lobby: party creation
    PartyCreationUnableGetUserRegistry = 11231,
    PartyCreationAlreadyInParty = 11232,
    PartyCreationUnableCreateParty = 11233,
    // Lobby: party leave
    PartyLeaveUnableGetUserRegistry = 11241,
    PartyLeavePartyIsNil = 11242,
    PartyLeavePartyNotFound = 11243,
    PartyLeaveUserNotInParty = 11244,
    PartyLeaveUnableToLeaveParty = 11245,
    // Lobby: party invite
    PartyInviteUnableGetUserRegistry = 11251,
    PartyInviteInviteeNotFound = 11252,
    PartyInviteNotInParty = 11253,
    PartyInviteInviteeInParty = 11254,
    PartyInviteUnableInviteToParty = 11255,
    // Lobby: party join
    PartyJoinUnableGetUserRegistry = 11261,
    PartyJoinPartyNotFound = 11262,
    PartyJoinInvalidInvitationToken = 11263,
    PartyJoinNotInvited = 11264,
    PartyJoinAlreadyInParty = 11265,
    PartyJoinPartyFull = 11266,
    PartyJoinUnableJoinParty = 11267,
    PartyJoinBlocked = 112610,
    // Lobby: party kick
    PartyKickUnableGetUserRegistry = 11271,
    PartyKickNotInParty = 11272,
    PartyKickNotLeader = 11273,
    PartyKickKickeeNotInParty = 11274,
    PartyKickUnableKickUser = 11275,
    PartyKickKickOwnSelf = 11277,
    // Lobby: personal chat
    PersonalChatUnableGetUserRegistry = 11281,
    PersonalChatSenderBanned = 11282,
    PersonalChatReceiverBanned = 11283,
    PersonalChatReceiverNotFound = 11284,
    PersonalChatUnableSaveChat = 11285,
    // Lobby: party chat
    PartyChatUnableGetUserRegistry = 11291,
    PartyChatSenderBanned = 11292,
    PartyChatPartyNotFound = 11293,
    PartyChatUnableSaveChat = 11294,
    PartyChatReceiverBanned = 11295,
    PartyChatReceiverNotFound = 11296,
    // Lobby: friends and presence
    ListFriendsUnableGetUserRegistry = 11301,
    ListFriendsUnableGetOnlineFiends = 11303,
    ListFriendsUnableGetAllOnlineUsers = 11305,
    ListNotificationUnableGetUserRegistry = 11311,
    ListNotificationUnableGetUserNotification = 11312,
    ListNotificationUnableDeleteUserNotification = 11314,
    SetUserStatusUnableSetStatus = 11331,
    SetUserStatusUnableGetUserRegistry = 11332,
    SetUserStatusUnableGetFriendsList = 11333,
    ResetUserStatusUnableGetFriendsList = 11334,
    ResetUserStatusUnableResetStatus = 11335,
    ListFriendsPresenceUnableGetUserRegistry = 11341,
    ListFriendsPresenceUnableGetOnlineFiends = 11343,
    ListFriendsPresenceUnableGetFriendsPresence = 11344,
    // Lobby: party leader promotion
    PartyPromoteLeaderUnableToGetUserRegistry = 11371,
    PartyPromoteLeaderUnableToGetPartyInfo = 11372,
    PartyPromoteLeaderUserPartyNotFound = 11373,
    PartyPromoteLeaderUserNotLeader = 11374,
    PartyPromoteLeaderUnableToPromoteLeader = 11375,
    // Lobby: matchmaking
    StartMatchmakingUnableToPush = 11601,
    StartMatchmakingUnableToFindUserRegistry = 11602,
    StartMatchmakingUserNotInParty = 11603,
    StartMatchmakingUnableToFindUserParty = 11604,
    StartMatchmakingNotPartyLeader = 11605,
    StartMatchmakingUnableToStoreMMStatus = 11606,
    StartMatchmakingMemberBanned = 11607,
    CancelMatchmakingUnableToFindUserParty = 11611,
    CancelMatchmakingUnableToGetPartyInfo = 11612,
    CancelMatchmakingNotPartyLeader = 11613,
    CancelMatchmakingUnableToPushCancelRequest = 11614,
    CancelMatchmakingNotInParty = 11615,
    MatchmakingUnableToFindParty = 11623,
    MatchmakingPartyNotFound = 11624,
    MatchmakingUnablePrepareReadyConsent = 11627,
    MatchmakingUnableSaveMMResult = 11629,
    SetReadyConsentUnableGetUserRegistry = 11631,
    SetReadyConsentNotFound = 11632,
    SetReadyConsentUnableSetReadyConsent = 11633,
    SetReadyConsentUnableGetMMResult = 11634,
    // Lobby: friend requests
    FriendRequestUnableRequestFriends = 11701,
    FriendRequestInvalidRequestBody = 11702,
    FriendRequestConflictFriendship = 11703,
    FriendRequestUnableGetUserRegistry = 11704,
    FriendRequestFriendRegistryNotFound = 11705,
    FriendRequestUnableGetFriendRegistry = 11706,
    ListIncomingFriendsUnableGetListIncoming = 11711,
    ListIncomingFriendsUnableToWriteResponse = 11712,
    ListIncomingFriendsUnableGetUserRegistry = 11713,
    ListIncomingFriendsDataNotFound = 11714,
    ListIncomingFriendsInvalidRequestBody = 11715,
    ListOutgoingFriendsUnableGetListOutgoing = 11721,
    ListOutgoingFriendsUnableToWriteResponse = 11722,
    ListOutgoingFriendsUnableGetUserRegistry = 11723,
    ListOutgoingFriendsDataNotFound = 11724,
    ListOutgoingFriendsInvalidRequestBody = 11725,
    AcceptFriendUnableAcceptFriends = 11731,
    /// Also reported as "friend list is empty"; see [`ErrorCode::FRIEND_LIST_IS_EMPTY`].
    AcceptFriendInvalidRequestBody = 11732,
    AcceptFriendDataNotFound = 11733,
    AcceptFriendUnableGetUserRegistry = 11734,
    AcceptFriendRequestorNotFound = 11735,
    AcceptFriendUnableGetRequestorRegistry = 11736,
    RejectFriendUnableRejectFriends = 11741,
    RejectFriendInvalidRequestBody = 11742,
    RejectFriendDataNotFound = 11743,
    RejectFriendUnableGetUserRegistry = 11744,
    CancelFriendUnableCancelFriends = 11751,
    CancelFriendInvalidRequestBody = 11752,
    CancelFriendDataNotFound = 11753,
    CancelFriendUnableGetUserRegistry = 11754,
    UnfriendUnableUnfriend = 11761,
    UnfriendInvalidRequestBody = 11762,
    UnfriendDataNotFound = 11763,
    UnfriendUnableGetUserRegistry = 11764,
    ListOfFriendsUnableGetListOfFriends = 11771,
    ListOfFriendsUnableGetUserRegistry = 11773,
    GetFriendshipStatusUnableGetFriendshipStatus = 11781,
    GetFriendshipStatusUnableGetUserRegistry = 11783,
    GetFriendshipStatusInvalidRequestBody = 11784,
    GetFriendsInvalidRequestBody = 11791,
    GetFriendsDataNotFound = 11792,
    GetFriendsUnableGetListOfFriends = 11793,
    GetFriendsUnableToWriteResponse = 11794,
    // Lobby: block / unblock
    PlayerBlockRequestInvalidRequestBody = 11811,
    PlayerBlockRequestUnableGetUserRegistry = 11812,
    PlayerBlockRequestUnableBlockPlayer = 11813,
    PlayerUnblockRequestInvalidRequestBody = 11814,
    PlayerUnblockRequestUnableGetUserRegistry = 11815,
    PlayerUnblockRequestUnableBlockPlayer = 11816,
    PlayerBlocked = 11817,
    PlayerBlockedUnableGet = 11818,
    // Lobby: channel chat
    ChannelChatSenderBanned = 11880,
    // Lobby: party storage
    PartyNotFound = 11901,
    /// The party storage was modified since the caller last read it.
    PartyStorageOutdatedUpdateData = 119017,

    // Cloud save
    GameRecordNotFound = 18003,
    PlayerRecordNotFound = 18022,
    GameRecordPreconditionFailed = 18056,
    PlayerPublicRecordNotFound = 18081,
    PlayerRecordPreconditionFailed = 18103,

    // Dedicated server manager
    DedicatedServerConfigNotFound = 9014123,
    DedicatedServerNotFound = 9014183,
}

impl ErrorCode {
    /// Alias sharing the value of [`ErrorCode::StatisticConfigNotFound`].
    pub const STATISTIC_NOT_FOUND: Self = Self::StatisticConfigNotFound;

    /// Alias sharing the value of [`ErrorCode::AcceptFriendInvalidRequestBody`].
    pub const FRIEND_LIST_IS_EMPTY: Self = Self::AcceptFriendInvalidRequestBody;

    /// Numeric value of the code.
    pub const fn code(self) -> i32 {
        self as i32
    }

    /// Whether the code sits in the HTTP status range (100-599).
    pub const fn is_http_status(self) -> bool {
        matches!(self as i32, 100..=599)
    }

    /// Maps an HTTP status to its code.
    ///
    /// Statuses without a dedicated variant collapse onto their class:
    /// 4xx becomes `BadRequest`, 5xx becomes `InternalServerError`, and
    /// anything outside 100-599 is an `InvalidResponse`.
    pub fn from_http_status(status: u16) -> Self {
        match Self::from_code(i64::from(status)) {
            Some(code) if code.is_http_status() => code,
            _ => match status {
                400..=499 => Self::BadRequest,
                500..=599 => Self::InternalServerError,
                _ => Self::InvalidResponse,
            },
        }
    }

    /// Language-neutral default message.
    ///
    /// Total over the enumeration: codes without a bespoke entry resolve to
    /// `"Unknown error: <name>"`.
    pub fn default_message(self) -> Cow<'static, str> {
        let message = match self {
            Self::None => "This error code doesn't make sense and should not happen at all.",

            Self::BadRequest => {
                "The request could not be understood by the server due to malformed syntax."
            }
            Self::Unauthorized => "The request requires user authentication.",
            Self::PaymentRequired => "The request requires a payment.",
            Self::Forbidden => "The server understood the request, but is refusing to fulfill it.",
            Self::NotFound => "The server has not found anything matching the Request-URI.",
            Self::MethodNotAllowed => {
                "The method specified in the Request-Line is not allowed for the resource \
                 identified by the Request-URI."
            }
            Self::NotAcceptable => {
                "The resource identified by the request can not generate content according to \
                 the accept headers sent in the request."
            }
            Self::ProxyAuthenticationRequired => {
                "The request requires user authentication via proxy."
            }
            Self::RequestTimeout => {
                "The client did not produce a request within the time that the server was \
                 prepared to wait."
            }
            Self::Conflict => {
                "The request could not be completed due to a conflict with the current state of \
                 the resource."
            }
            Self::Gone => {
                "The requested resource is no longer available at the server and no forwarding \
                 address is known."
            }
            Self::LengthRequired => {
                "The server refuses to accept the request without a defined Content-Length."
            }
            Self::PreconditionFailed => {
                "The precondition given in one or more of the request-header fields evaluated \
                 to false when it was tested on the server."
            }
            Self::RequestEntityTooLarge => {
                "The request entity is larger than the server is willing or able to process."
            }
            Self::RequestUriTooLong => {
                "The Request-URI is longer than the server is willing to interpret."
            }
            Self::UnsupportedMediaType => {
                "The entity of the request is in a format not supported by the requested \
                 resource for the requested method."
            }
            Self::RequestedRangeNotSatisfiable => {
                "The request included a Range request-header field but none of the \
                 range-specifier values in this field overlap the current extent of the \
                 selected resource, and the request did not include an If-Range request-header \
                 field."
            }
            Self::ExpectationFailed => {
                "The expectation given in an Expect request-header field could not be met by \
                 this server."
            }
            Self::UnprocessableEntity => "Entity can not be processed.",
            Self::HttpTooManyRequests => "Too many requests were sent in a given amount of time.",
            Self::InternalServerError => {
                "Unexpected condition encountered which prevented the server from fulfilling \
                 the request."
            }
            Self::NotImplemented => {
                "The server does not support the functionality required to fulfill the request."
            }
            Self::BadGateway => {
                "The gateway or proxy received an invalid response from the upstream server."
            }
            Self::ServiceUnavailable => {
                "The server is currently unable to handle the request due to a temporary \
                 overloading or maintenance of the server."
            }
            Self::GatewayTimeout => {
                "The gateway or proxy, did not receive a timely response from the upstream \
                 server."
            }
            Self::HttpVersionNotSupported => {
                "The server does not support the HTTP protocol version that was used in the \
                 request message."
            }

            Self::InvalidArgument => "One or more arguments of the call are missing or invalid.",
            Self::InvalidRequest => "The request could not be built.",
            Self::InvalidResponse => "The response could not be parsed.",
            Self::NetworkError => "There is no response.",
            Self::IsNotLoggedIn => "User is not logged in.",
            Self::MessageFieldTypeNotSupported => {
                "Serialization for expected field type is not supported."
            }
            Self::MessageFormatInvalid => "Message is not well formed.",
            Self::MessageFieldDoesNotExist => "Expected message field cannot be found.",
            Self::MessageFieldConversionFailed => {
                "Message field value cannot be converted to expected field type."
            }
            Self::MessageCannotBeSent => "Sending message to server failed.",

            Self::PartyStorageOutdatedUpdateData => {
                "The party storage was updated by someone else. Fetch it again and retry."
            }

            _ => return Cow::Owned(format!("Unknown error: {}", self.name())),
        };
        Cow::Borrowed(message)
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name(), self.code())
    }
}

impl Serialize for ErrorCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i32(self.code())
    }
}

impl<'de> Deserialize<'de> for ErrorCode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = i64::deserialize(deserializer)?;
        Self::from_code(raw)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown error code {raw}")))
    }
}
