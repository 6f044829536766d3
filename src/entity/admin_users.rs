use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "admin_users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub username: String,
    pub password_hash: String,
    pub can_manage_products: bool,
    pub can_manage_orders: bool,
    pub can_manage_reviews: bool,
    pub can_manage_admins: bool,
    pub is_active: bool,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::admin_activities::Entity")]
    AdminActivities,
}

impl Related<super::admin_activities::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AdminActivities.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
