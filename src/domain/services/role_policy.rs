use crate::domain::models::user::{Role, User};
use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessLevel {
    /// Any approved user.
    Authenticated,
    AdminOnly,
}

/// Every guarded operation class in the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    ReadPatient,
    WritePatient,
    DeletePatient,
    ReadInvoice,
    WriteInvoice,
    PrintInvoice,
    DeleteInvoice,
    ReadAppointment,
    WriteAppointment,
    UpdateAppointmentStatus,
    DeleteAppointment,
    ManageLedger,
    ReadExchangeRate,
    UpdateExchangeRate,
    ManageUsers,
    ReadActivityLog,
    Export,
    ViewDashboard,
    ViewReports,
}

impl Operation {
    pub fn required_level(self) -> AccessLevel {
        use Operation::*;
        match self {
            ReadPatient | WritePatient | ReadInvoice | WriteInvoice | PrintInvoice
            | ReadAppointment | WriteAppointment | UpdateAppointmentStatus | DeleteAppointment
            | ReadExchangeRate => AccessLevel::Authenticated,
            DeletePatient | DeleteInvoice | ManageLedger | UpdateExchangeRate | ManageUsers
            | ReadActivityLog | Export | ViewDashboard | ViewReports => AccessLevel::AdminOnly,
        }
    }
}

pub fn permits(role: Role, level: AccessLevel) -> bool {
    match (role, level) {
        (Role::Pending, _) => false,
        (Role::Admin, _) => true,
        (Role::Staff, AccessLevel::Authenticated) => true,
        (Role::Staff, AccessLevel::AdminOnly) => false,
    }
}

pub fn authorize(user: &User, operation: Operation) -> Result<(), AppError> {
    let level = operation.required_level();
    if permits(user.role, level) {
        return Ok(());
    }

    let message = match (user.role, level) {
        (Role::Pending, _) => "Account is pending approval",
        (_, AccessLevel::AdminOnly) => "Admin access required",
        _ => "Access denied",
    };
    Err(AppError::Forbidden(message.to_string()))
}

/// Admins cannot remove their own account.
pub fn ensure_not_self(actor: &User, target_user_id: &str) -> Result<(), AppError> {
    if actor.user_id == target_user_id {
        return Err(AppError::Validation("Cannot delete your own account".to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(role: Role) -> User {
        User::new(format!("{}@clinic.test", role), "Test".into(), None, role)
    }

    #[test]
    fn test_admin_only_is_admin_only() {
        for role in [Role::Admin, Role::Staff, Role::Pending] {
            assert_eq!(permits(role, AccessLevel::AdminOnly), role == Role::Admin, "{}", role);
        }
    }

    #[test]
    fn test_pending_is_rejected_everywhere() {
        let pending = user(Role::Pending);
        for op in [Operation::ReadPatient, Operation::ReadExchangeRate, Operation::ManageUsers] {
            assert!(matches!(authorize(&pending, op), Err(AppError::Forbidden(_))));
        }
    }

    #[test]
    fn test_staff_matrix() {
        let staff = user(Role::Staff);
        assert!(authorize(&staff, Operation::WritePatient).is_ok());
        assert!(authorize(&staff, Operation::DeleteAppointment).is_ok());
        assert!(authorize(&staff, Operation::PrintInvoice).is_ok());
        assert!(authorize(&staff, Operation::ReadExchangeRate).is_ok());

        assert!(authorize(&staff, Operation::DeletePatient).is_err());
        assert!(authorize(&staff, Operation::DeleteInvoice).is_err());
        assert!(authorize(&staff, Operation::ManageLedger).is_err());
        assert!(authorize(&staff, Operation::UpdateExchangeRate).is_err());
        assert!(authorize(&staff, Operation::ViewDashboard).is_err());
        assert!(authorize(&staff, Operation::Export).is_err());
    }

    #[test]
    fn test_self_delete_is_a_validation_error() {
        let admin = user(Role::Admin);
        assert!(matches!(ensure_not_self(&admin, &admin.user_id), Err(AppError::Validation(_))));
        assert!(ensure_not_self(&admin, "user_other").is_ok());
    }
}
