use async_trait::async_trait;
use sqlx::{
    postgres::PgRow, query_builder::Separated, types::Json, Encode, FromRow, PgPool, Postgres,
    QueryBuilder, Row, Type,
};
use std::str::FromStr;

use super::manager::DbResult;
use super::models::{
    MaintenancePatch, MaintenanceRequest, MaintenanceStatus, NewMaintenanceRequest, NewProperty,
    NewTenant, NewTransaction, ParseEnumError, Property, PropertyPatch, Tenant, TenantPatch,
    Transaction, TransactionPatch, UpsertUser, User,
};
use super::store::EntityStore;

/// `EntityStore` backed by PostgreSQL
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn enum_column<T>(row: &PgRow, column: &str) -> Result<T, sqlx::Error>
where
    T: FromStr<Err = ParseEnumError>,
{
    let raw: String = row.try_get(column)?;
    raw.parse().map_err(|e: ParseEnumError| sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: Box::new(e),
    })
}

impl<'r> FromRow<'r, PgRow> for Property {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        let Json(images): Json<Vec<String>> = row.try_get("images")?;
        Ok(Property {
            id: row.try_get("id")?,
            user_id: row.try_get("user_id")?,
            name: row.try_get("name")?,
            address: row.try_get("address")?,
            city: row.try_get("city")?,
            province: row.try_get("province")?,
            postal_code: row.try_get("postal_code")?,
            property_type: row.try_get("property_type")?,
            bedrooms: row.try_get("bedrooms")?,
            bathrooms: row.try_get("bathrooms")?,
            square_footage: row.try_get("square_footage")?,
            rent_amount: row.try_get("rent_amount")?,
            status: enum_column(row, "status")?,
            description: row.try_get("description")?,
            images,
            amenities: row.try_get("amenities")?,
            pet_policy: row.try_get("pet_policy")?,
            smoking_policy: row.try_get("smoking_policy")?,
            available_date: row.try_get("available_date")?,
            is_active: row.try_get("is_active")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

impl<'r> FromRow<'r, PgRow> for Tenant {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(Tenant {
            id: row.try_get("id")?,
            property_id: row.try_get("property_id")?,
            first_name: row.try_get("first_name")?,
            last_name: row.try_get("last_name")?,
            email: row.try_get("email")?,
            phone: row.try_get("phone")?,
            emergency_contact: row.try_get("emergency_contact")?,
            lease_start: row.try_get("lease_start")?,
            lease_end: row.try_get("lease_end")?,
            rent_amount: row.try_get("rent_amount")?,
            deposit_amount: row.try_get("deposit_amount")?,
            is_active: row.try_get("is_active")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

impl<'r> FromRow<'r, PgRow> for MaintenanceRequest {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        let Json(images): Json<Vec<String>> = row.try_get("images")?;
        Ok(MaintenanceRequest {
            id: row.try_get("id")?,
            property_id: row.try_get("property_id")?,
            tenant_id: row.try_get("tenant_id")?,
            title: row.try_get("title")?,
            description: row.try_get("description")?,
            priority: enum_column(row, "priority")?,
            status: enum_column(row, "status")?,
            category: row.try_get("category")?,
            estimated_cost: row.try_get("estimated_cost")?,
            actual_cost: row.try_get("actual_cost")?,
            scheduled_date: row.try_get("scheduled_date")?,
            completed_date: row.try_get("completed_date")?,
            images,
            notes: row.try_get("notes")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

impl<'r> FromRow<'r, PgRow> for Transaction {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(Transaction {
            id: row.try_get("id")?,
            property_id: row.try_get("property_id")?,
            tenant_id: row.try_get("tenant_id")?,
            kind: enum_column(row, "type")?,
            category: row.try_get("category")?,
            amount: row.try_get("amount")?,
            description: row.try_get("description")?,
            transaction_date: row.try_get("transaction_date")?,
            is_paid: row.try_get("is_paid")?,
            payment_method: row.try_get("payment_method")?,
            receipt_url: row.try_get("receipt_url")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

/// Push `column = $n` when the patch carries a value for it
fn assign<'args, T>(set: &mut Separated<'_, 'args, Postgres, &'static str>, column: &str, value: Option<T>)
where
    T: 'args + Encode<'args, Postgres> + Send + Type<Postgres>,
{
    if let Some(value) = value {
        set.push(format!("{} = ", column));
        set.push_bind_unseparated(value);
    }
}

const LIST_ORDER: &str = "ORDER BY created_at DESC, id DESC";

#[async_trait]
impl EntityStore for PgStore {
    async fn ping(&self) -> DbResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn get_user(&self, id: &str) -> DbResult<Option<User>> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn upsert_user(&self, user: UpsertUser) -> DbResult<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, email, first_name, last_name, profile_image_url)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (id) DO UPDATE SET
                email = EXCLUDED.email,
                first_name = EXCLUDED.first_name,
                last_name = EXCLUDED.last_name,
                profile_image_url = EXCLUDED.profile_image_url,
                updated_at = NOW()
            RETURNING *
            "#,
        )
        .bind(&user.id)
        .bind(&user.email)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.profile_image_url)
        .fetch_one(&self.pool)
        .await?;
        Ok(user)
    }

    async fn list_properties(&self, owner_id: &str) -> DbResult<Vec<Property>> {
        let sql = format!("SELECT * FROM properties WHERE user_id = $1 {}", LIST_ORDER);
        let rows = sqlx::query_as::<_, Property>(&sql)
            .bind(owner_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn find_property(&self, id: i32, owner_id: &str) -> DbResult<Option<Property>> {
        let row = sqlx::query_as::<_, Property>(
            "SELECT * FROM properties WHERE id = $1 AND user_id = $2",
        )
        .bind(id)
        .bind(owner_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn insert_property(&self, owner_id: &str, input: NewProperty) -> DbResult<Property> {
        let row = sqlx::query_as::<_, Property>(
            r#"
            INSERT INTO properties (
                user_id, name, address, city, province, postal_code, property_type,
                bedrooms, bathrooms, square_footage, rent_amount, status, description,
                images, amenities, pet_policy, smoking_policy, available_date, is_active
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19)
            RETURNING *
            "#,
        )
        .bind(owner_id)
        .bind(input.name)
        .bind(input.address)
        .bind(input.city)
        .bind(input.province)
        .bind(input.postal_code)
        .bind(input.property_type)
        .bind(input.bedrooms)
        .bind(input.bathrooms)
        .bind(input.square_footage)
        .bind(input.rent_amount)
        .bind(input.status.as_str())
        .bind(input.description)
        .bind(Json(input.images))
        .bind(input.amenities)
        .bind(input.pet_policy)
        .bind(input.smoking_policy)
        .bind(input.available_date)
        .bind(input.is_active)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn update_property(
        &self,
        id: i32,
        owner_id: &str,
        patch: PropertyPatch,
    ) -> DbResult<Option<Property>> {
        let mut qb = QueryBuilder::<Postgres>::new("UPDATE properties SET ");
        {
            let mut set = qb.separated(", ");
            assign(&mut set, "name", patch.name);
            assign(&mut set, "address", patch.address);
            assign(&mut set, "city", patch.city);
            assign(&mut set, "province", patch.province);
            assign(&mut set, "postal_code", patch.postal_code);
            assign(&mut set, "property_type", patch.property_type);
            assign(&mut set, "bedrooms", patch.bedrooms);
            assign(&mut set, "bathrooms", patch.bathrooms);
            assign(&mut set, "square_footage", patch.square_footage);
            assign(&mut set, "rent_amount", patch.rent_amount);
            assign(&mut set, "status", patch.status.map(|s| s.as_str()));
            assign(&mut set, "description", patch.description);
            assign(&mut set, "images", patch.images.map(Json));
            assign(&mut set, "amenities", patch.amenities);
            assign(&mut set, "pet_policy", patch.pet_policy);
            assign(&mut set, "smoking_policy", patch.smoking_policy);
            assign(&mut set, "available_date", patch.available_date);
            assign(&mut set, "is_active", patch.is_active);
            set.push("updated_at = NOW()");
        }
        qb.push(" WHERE id = ")
            .push_bind(id)
            .push(" AND user_id = ")
            .push_bind(owner_id)
            .push(" RETURNING *");

        let row = qb.build_query_as::<Property>().fetch_optional(&self.pool).await?;
        Ok(row)
    }

    async fn delete_property(&self, id: i32, owner_id: &str) -> DbResult<bool> {
        let result = sqlx::query("DELETE FROM properties WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(owner_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_tenants(&self, property_id: i32) -> DbResult<Vec<Tenant>> {
        let sql = format!("SELECT * FROM tenants WHERE property_id = $1 {}", LIST_ORDER);
        let rows = sqlx::query_as::<_, Tenant>(&sql)
            .bind(property_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn find_tenant_for_owner(&self, id: i32, owner_id: &str) -> DbResult<Option<Tenant>> {
        let row = sqlx::query_as::<_, Tenant>(
            r#"
            SELECT t.* FROM tenants t
            INNER JOIN properties p ON p.id = t.property_id
            WHERE t.id = $1 AND p.user_id = $2
            "#,
        )
        .bind(id)
        .bind(owner_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn insert_tenant(&self, input: NewTenant) -> DbResult<Tenant> {
        let row = sqlx::query_as::<_, Tenant>(
            r#"
            INSERT INTO tenants (
                property_id, first_name, last_name, email, phone, emergency_contact,
                lease_start, lease_end, rent_amount, deposit_amount, is_active
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING *
            "#,
        )
        .bind(input.property_id)
        .bind(input.first_name)
        .bind(input.last_name)
        .bind(input.email)
        .bind(input.phone)
        .bind(input.emergency_contact)
        .bind(input.lease_start)
        .bind(input.lease_end)
        .bind(input.rent_amount)
        .bind(input.deposit_amount)
        .bind(input.is_active)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn update_tenant(&self, id: i32, patch: TenantPatch) -> DbResult<Option<Tenant>> {
        let mut qb = QueryBuilder::<Postgres>::new("UPDATE tenants SET ");
        {
            let mut set = qb.separated(", ");
            assign(&mut set, "property_id", patch.property_id);
            assign(&mut set, "first_name", patch.first_name);
            assign(&mut set, "last_name", patch.last_name);
            assign(&mut set, "email", patch.email);
            assign(&mut set, "phone", patch.phone);
            assign(&mut set, "emergency_contact", patch.emergency_contact);
            assign(&mut set, "lease_start", patch.lease_start);
            assign(&mut set, "lease_end", patch.lease_end);
            assign(&mut set, "rent_amount", patch.rent_amount);
            assign(&mut set, "deposit_amount", patch.deposit_amount);
            assign(&mut set, "is_active", patch.is_active);
            set.push("updated_at = NOW()");
        }
        qb.push(" WHERE id = ").push_bind(id).push(" RETURNING *");

        let row = qb.build_query_as::<Tenant>().fetch_optional(&self.pool).await?;
        Ok(row)
    }

    async fn delete_tenant(&self, id: i32) -> DbResult<bool> {
        let result = sqlx::query("DELETE FROM tenants WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_maintenance(&self, property_id: i32) -> DbResult<Vec<MaintenanceRequest>> {
        let sql = format!(
            "SELECT * FROM maintenance_requests WHERE property_id = $1 {}",
            LIST_ORDER
        );
        let rows = sqlx::query_as::<_, MaintenanceRequest>(&sql)
            .bind(property_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn find_maintenance_for_owner(
        &self,
        id: i32,
        owner_id: &str,
    ) -> DbResult<Option<MaintenanceRequest>> {
        let row = sqlx::query_as::<_, MaintenanceRequest>(
            r#"
            SELECT m.* FROM maintenance_requests m
            INNER JOIN properties p ON p.id = m.property_id
            WHERE m.id = $1 AND p.user_id = $2
            "#,
        )
        .bind(id)
        .bind(owner_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn insert_maintenance(
        &self,
        property_id: i32,
        input: NewMaintenanceRequest,
    ) -> DbResult<MaintenanceRequest> {
        let row = sqlx::query_as::<_, MaintenanceRequest>(
            r#"
            INSERT INTO maintenance_requests (
                property_id, tenant_id, title, description, priority, status, category,
                estimated_cost, actual_cost, scheduled_date, completed_date, images, notes
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING *
            "#,
        )
        .bind(property_id)
        .bind(input.tenant_id)
        .bind(input.title)
        .bind(input.description)
        .bind(input.priority.as_str())
        .bind(input.status.as_str())
        .bind(input.category)
        .bind(input.estimated_cost)
        .bind(input.actual_cost)
        .bind(input.scheduled_date)
        .bind(input.completed_date)
        .bind(Json(input.images))
        .bind(input.notes)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn update_maintenance(
        &self,
        id: i32,
        patch: MaintenancePatch,
    ) -> DbResult<Option<MaintenanceRequest>> {
        let mut qb = QueryBuilder::<Postgres>::new("UPDATE maintenance_requests SET ");
        {
            let mut set = qb.separated(", ");
            assign(&mut set, "property_id", patch.property_id);
            assign(&mut set, "tenant_id", patch.tenant_id);
            assign(&mut set, "title", patch.title);
            assign(&mut set, "description", patch.description);
            assign(&mut set, "priority", patch.priority.map(|p| p.as_str()));
            assign(&mut set, "status", patch.status.map(|s| s.as_str()));
            assign(&mut set, "category", patch.category);
            assign(&mut set, "estimated_cost", patch.estimated_cost);
            assign(&mut set, "actual_cost", patch.actual_cost);
            assign(&mut set, "scheduled_date", patch.scheduled_date);
            assign(&mut set, "completed_date", patch.completed_date);
            assign(&mut set, "images", patch.images.map(Json));
            assign(&mut set, "notes", patch.notes);
            set.push("updated_at = NOW()");
        }
        qb.push(" WHERE id = ").push_bind(id).push(" RETURNING *");

        let row = qb
            .build_query_as::<MaintenanceRequest>()
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn delete_maintenance(&self, id: i32) -> DbResult<bool> {
        let result = sqlx::query("DELETE FROM maintenance_requests WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn count_maintenance_for_owner(
        &self,
        owner_id: &str,
        status: MaintenanceStatus,
    ) -> DbResult<i64> {
        let (count,): (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*) FROM maintenance_requests m
            INNER JOIN properties p ON p.id = m.property_id
            WHERE p.user_id = $1 AND m.status = $2
            "#,
        )
        .bind(owner_id)
        .bind(status.as_str())
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    async fn list_transactions(&self, property_id: i32) -> DbResult<Vec<Transaction>> {
        let sql = format!("SELECT * FROM transactions WHERE property_id = $1 {}", LIST_ORDER);
        let rows = sqlx::query_as::<_, Transaction>(&sql)
            .bind(property_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn find_transaction_for_owner(
        &self,
        id: i32,
        owner_id: &str,
    ) -> DbResult<Option<Transaction>> {
        let row = sqlx::query_as::<_, Transaction>(
            r#"
            SELECT x.* FROM transactions x
            INNER JOIN properties p ON p.id = x.property_id
            WHERE x.id = $1 AND p.user_id = $2
            "#,
        )
        .bind(id)
        .bind(owner_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn insert_transaction(
        &self,
        property_id: i32,
        input: NewTransaction,
    ) -> DbResult<Transaction> {
        let row = sqlx::query_as::<_, Transaction>(
            r#"
            INSERT INTO transactions (
                property_id, tenant_id, type, category, amount, description,
                transaction_date, is_paid, payment_method, receipt_url
            )
            VALUES ($1, $2, $3, $4, $5, $6, COALESCE($7, NOW()), $8, $9, $10)
            RETURNING *
            "#,
        )
        .bind(property_id)
        .bind(input.tenant_id)
        .bind(input.kind.as_str())
        .bind(input.category)
        .bind(input.amount)
        .bind(input.description)
        .bind(input.transaction_date)
        .bind(input.is_paid)
        .bind(input.payment_method)
        .bind(input.receipt_url)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    async fn update_transaction(
        &self,
        id: i32,
        patch: TransactionPatch,
    ) -> DbResult<Option<Transaction>> {
        let mut qb = QueryBuilder::<Postgres>::new("UPDATE transactions SET ");
        {
            let mut set = qb.separated(", ");
            assign(&mut set, "property_id", patch.property_id);
            assign(&mut set, "tenant_id", patch.tenant_id);
            assign(&mut set, "type", patch.kind.map(|k| k.as_str()));
            assign(&mut set, "category", patch.category);
            assign(&mut set, "amount", patch.amount);
            assign(&mut set, "description", patch.description);
            assign(&mut set, "transaction_date", patch.transaction_date.flatten());
            assign(&mut set, "is_paid", patch.is_paid);
            assign(&mut set, "payment_method", patch.payment_method);
            assign(&mut set, "receipt_url", patch.receipt_url);
            set.push("updated_at = NOW()");
        }
        qb.push(" WHERE id = ").push_bind(id).push(" RETURNING *");

        let row = qb
            .build_query_as::<Transaction>()
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn delete_transaction(&self, id: i32) -> DbResult<bool> {
        let result = sqlx::query("DELETE FROM transactions WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
