//! User-facing message catalog (Arabic)
//!
//! Every string returned to the frontend lives here; log output stays
//! English. Error messages describe the business condition only, never
//! internal identifiers.

/// Wrong username/password (also covers unknown user at login).
pub const INVALID_CREDENTIALS: &str = "اسم المستخدم أو كلمة المرور غير صحيحة";

/// Username lookup failed on a post-login endpoint.
pub const USER_NOT_FOUND: &str = "المستخدم غير موجود";

/// Caller lacks the required access level.
pub const L2_REQUIRED: &str = "هذه العملية متاحة لمسؤول المنطقة فقط";

/// L1 caller tried to act for a branch other than their own.
pub const BRANCH_MISMATCH: &str = "لا يمكنك تقديم طلب لفرع آخر";

/// Required request fields are missing or malformed.
pub const MISSING_FIELDS: &str = "البيانات المطلوبة غير مكتملة";

/// A submitted order carried no items.
pub const EMPTY_ORDER: &str = "لا يمكن إرسال طلب فارغ";

/// A mutation found no rows for the given serial/branch this month.
pub const NO_MATCHING_ROWS: &str = "لم يتم العثور على الطلب المطلوب";

/// The client partition is missing its data-store pointer (cell F2).
pub const MISSING_CONFIGURATION: &str = "إعدادات العميل غير مكتملة، يرجى مراجعة المسؤول";

/// The spreadsheet service could not be reached.
pub const STORE_UNAVAILABLE: &str = "تعذر الاتصال بمصدر البيانات، حاول مرة أخرى";

/// Catch-all for unexpected failures.
pub const INTERNAL_ERROR: &str = "حدث خطأ غير متوقع، حاول مرة أخرى لاحقاً";

/// Shown as requestedBy when an order's lines disagree on the requester.
pub const MULTIPLE_REQUESTERS: &str = "أكثر من مستخدم";

// ── Status labels (summary keys and export column B) ──────────────

pub const STATUS_WAITING: &str = "قيد الموافقة";
pub const STATUS_APPROVED: &str = "تمت الموافقة";
pub const STATUS_CANCELLED: &str = "ملغي";
