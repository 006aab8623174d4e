use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    #[sea_orm(unique)]
    pub email: String,
    pub phone: String,
    pub password_hash: String,
    pub agree_to_terms: bool,
    pub subscribe_newsletter: bool,
    pub is_active: bool,
    pub registration_time: i64,
    pub last_login: Option<i64>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::health_form::Entity")]
    HealthForms,
}

impl Related<super::health_form::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::HealthForms.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Display name used by the admin views ("first last").
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}
