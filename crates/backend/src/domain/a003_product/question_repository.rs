use chrono::Utc;
use contracts::domain::a003_product::ProductQuestion;
use uuid::Uuid;

use sea_orm::entity::prelude::*;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

use crate::shared::data::db::get_connection;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "a003_product_question")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub product_id: String,
    pub question: String,
    pub answer: Option<String>,
    pub is_answered: bool,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for ProductQuestion {
    fn from(m: Model) -> Self {
        ProductQuestion {
            id: m.id,
            product_id: m.product_id,
            question: m.question,
            answer: m.answer,
            is_answered: m.is_answered,
            created_at: m.created_at.unwrap_or_else(Utc::now),
        }
    }
}

fn conn() -> &'static DatabaseConnection {
    get_connection()
}

/// Создать вопрос без ответа
pub async fn insert_question(product_id: Uuid, question: &str) -> anyhow::Result<Uuid> {
    let id = Uuid::new_v4();
    let now = Utc::now();
    let active = ActiveModel {
        id: Set(id.to_string()),
        product_id: Set(product_id.to_string()),
        question: Set(question.to_string()),
        answer: Set(None),
        is_answered: Set(false),
        created_at: Set(Some(now)),
        updated_at: Set(Some(now)),
    };
    active.insert(conn()).await?;
    Ok(id)
}

/// Записать ответ и пометить вопрос отвеченным
pub async fn set_answer(question_id: Uuid, answer: &str) -> anyhow::Result<()> {
    use sea_orm::sea_query::Expr;
    let result = Entity::update_many()
        .col_expr(Column::Answer, Expr::value(answer.to_string()))
        .col_expr(Column::IsAnswered, Expr::value(true))
        .col_expr(Column::UpdatedAt, Expr::value(Utc::now()))
        .filter(Column::Id.eq(question_id.to_string()))
        .exec(conn())
        .await?;
    if result.rows_affected == 0 {
        anyhow::bail!("Question {} not found", question_id);
    }
    Ok(())
}

/// Вопросы товара в порядке создания
pub async fn list_by_product(product_id: Uuid) -> anyhow::Result<Vec<ProductQuestion>> {
    let items = Entity::find()
        .filter(Column::ProductId.eq(product_id.to_string()))
        .order_by_asc(Column::CreatedAt)
        .all(conn())
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    Ok(items)
}
