use crate::ir::{HttpMethod, OperationType, SegmentType};

use super::heuristics::Heuristics;
use super::name_normalizer::clean_name;

/// Produces user-facing CRUD operation names for the resources of one service.
#[derive(Debug, Clone)]
pub struct OperationNamer<'h> {
    /// Singular clean service name, e.g. `User` for service `users`.
    service_prefix: String,
    heuristics: &'h Heuristics,
}

impl<'h> OperationNamer<'h> {
    pub fn new(service: &str, heuristics: &'h Heuristics) -> Self {
        Self {
            service_prefix: heuristics.singularize(&clean_name(service)),
            heuristics,
        }
    }

    /// The resource name without the singular service prefix:
    /// `UserAssignLicense` → `AssignLicense` in service `users`.
    pub fn short_name<'n>(&self, resource_name: &'n str) -> &'n str {
        resource_name
            .strip_prefix(self.service_prefix.as_str())
            .unwrap_or(resource_name)
    }

    /// Name an operation from its type and the shape of its path.
    ///
    /// A trailing `Ref` left over from an OData reference segment is always
    /// removed, so `Add<Name>Ref` reads `Add<Name>`.
    pub fn name(
        &self,
        operation_type: OperationType,
        method: HttpMethod,
        resource_name: &str,
        last_segment: Option<SegmentType>,
    ) -> String {
        let h = self.heuristics;
        let is_verb = h.verbs.matches(self.short_name(resource_name)).is_some();
        let is_reference = last_segment == Some(SegmentType::ODataReference);

        let name = match operation_type {
            OperationType::List if is_verb => resource_name.to_string(),
            OperationType::List => format!("List{}", h.pluralize(resource_name)),
            OperationType::Read => format!("Get{resource_name}"),
            OperationType::Create if is_verb => resource_name.to_string(),
            OperationType::Create if is_reference => {
                format!("Add{}", h.singularize(resource_name))
            }
            OperationType::Create => format!("Create{}", h.singularize(resource_name)),
            OperationType::CreateUpdate => {
                format!("CreateUpdate{}", h.singularize(resource_name))
            }
            OperationType::Update => format!("Update{}", h.singularize(resource_name)),
            OperationType::Delete if is_reference => format!("Remove{resource_name}"),
            OperationType::Delete => format!("Delete{resource_name}"),
            OperationType::Unknown => format!("{}{resource_name}", method.pascal_case()),
        };

        match name.strip_suffix("Ref") {
            Some(stripped) => stripped.to_string(),
            None => name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn namer(h: &Heuristics) -> OperationNamer<'_> {
        OperationNamer::new("users", h)
    }

    #[test]
    fn test_short_name() {
        let h = Heuristics::default();
        let n = namer(&h);
        assert_eq!(n.short_name("UserAssignLicense"), "AssignLicense");
        assert_eq!(n.short_name("User"), "");
        assert_eq!(n.short_name("Message"), "Message");
    }

    #[test]
    fn test_crud_names() {
        let h = Heuristics::default();
        let n = namer(&h);
        let last = Some(SegmentType::UserValue);
        assert_eq!(
            n.name(OperationType::List, HttpMethod::Get, "Message", Some(SegmentType::Label)),
            "ListMessages"
        );
        assert_eq!(n.name(OperationType::Read, HttpMethod::Get, "Message", last), "GetMessage");
        assert_eq!(
            n.name(OperationType::Create, HttpMethod::Post, "Message", Some(SegmentType::Label)),
            "CreateMessage"
        );
        assert_eq!(
            n.name(OperationType::CreateUpdate, HttpMethod::Put, "Message", last),
            "CreateUpdateMessage"
        );
        assert_eq!(
            n.name(OperationType::Update, HttpMethod::Patch, "Message", last),
            "UpdateMessage"
        );
        assert_eq!(
            n.name(OperationType::Delete, HttpMethod::Delete, "Message", last),
            "DeleteMessage"
        );
    }

    #[test]
    fn test_verb_shaped_resources_keep_their_name() {
        let h = Heuristics::default();
        let n = namer(&h);
        assert_eq!(
            n.name(OperationType::Create, HttpMethod::Post, "UserAssignLicense", None),
            "UserAssignLicense"
        );
        assert_eq!(
            n.name(OperationType::List, HttpMethod::Get, "UserRevokeSession", None),
            "UserRevokeSession"
        );
    }

    #[test]
    fn test_reference_names_drop_ref_suffix() {
        let h = Heuristics::default();
        let n = namer(&h);
        let reference = Some(SegmentType::ODataReference);
        assert_eq!(
            n.name(OperationType::Create, HttpMethod::Post, "GroupMemberRef", reference),
            "AddGroupMember"
        );
        assert_eq!(
            n.name(OperationType::Delete, HttpMethod::Delete, "UserManagerRef", reference),
            "RemoveUserManager"
        );
        assert_eq!(
            n.name(OperationType::CreateUpdate, HttpMethod::Put, "UserManagerRef", reference),
            "CreateUpdateUserManager"
        );
    }

    #[test]
    fn test_unknown_uses_method_prefix() {
        let h = Heuristics::default();
        let n = namer(&h);
        assert_eq!(
            n.name(OperationType::Unknown, HttpMethod::Head, "Message", None),
            "HeadMessage"
        );
    }
}
