use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "health_assessment_forms")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    /// Public form identifier handed to the citizen (F + yymmddHHMM + 3 digits).
    #[sea_orm(unique)]
    pub form_id: String,
    pub user_id: i32,
    pub full_name: String,
    pub father_mother_name: String,
    pub age: i32,
    pub gender: String,
    pub contact: String,
    pub complete_address: String,
    pub medical_system: String,
    pub primary_issue: String,
    pub symptoms: Option<String>,
    /// One of `submitted`, `reviewed`, `consultation_scheduled`, `completed`.
    pub status: String,
    pub admin_notes: Option<String>,
    pub assigned_doctor_id: Option<i32>,
    pub consultation_date: Option<i64>,
    pub submitted_at: i64,
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
