//! Permission hooks implemented per entity.

/// Entity-level (`can_browse`, `can_add`) and instance-level (`can_read`,
/// `can_edit`, `can_delete`) authorization checks.
///
/// Every method is required: an entity that opts in must decide each case.
pub trait ModelPermissions {
    /// Principal the checks are evaluated for.
    type User;

    /// May `user` list entities of this type.
    fn can_browse(user: &Self::User) -> bool;

    /// May `user` view this instance.
    fn can_read(&self, user: &Self::User) -> bool;

    /// May `user` update this instance.
    fn can_edit(&self, user: &Self::User) -> bool;

    /// May `user` create entities of this type.
    fn can_add(user: &Self::User) -> bool;

    /// May `user` delete this instance.
    fn can_delete(&self, user: &Self::User) -> bool;
}
