#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    PaymentView,
    PaymentSendReceipt,
}

impl Permission {
    pub fn as_str(&self) -> &'static str {
        match self {
            Permission::PaymentView => "payment:view",
            Permission::PaymentSendReceipt => "payment:send_receipt",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "payment:view" => Some(Permission::PaymentView),
            "payment:send_receipt" => Some(Permission::PaymentSendReceipt),
            _ => None,
        }
    }
}

/// The authenticated caller, as asserted by the upstream token verifier.
/// Built per request by the auth middleware, never read from ambient state.
#[derive(Debug, Clone)]
pub struct Principal {
    pub user_id: String,
    pub email: String,
    pub permissions: Vec<Permission>,
}

impl Principal {
    pub fn has(&self, permission: Permission) -> bool {
        self.permissions.contains(&permission)
    }
}
