use crate::error::DbError;
use crate::store::FleetStore;
use async_trait::async_trait;
use core_types::{
    Bank, Catch, CatchFact, CatchFilter, CrewFilter, CrewMember, NewBank, NewCatch, NewCrewMember, NewUser, NewVessel,
    NewVisit, NewVoyage, ReportFilter, User, Vessel, Visit, VisitFilter, Voyage, VoyageFilter,
};
use sqlx::postgres::PgPool;

/// The `DbRepository` is the PostgreSQL-backed [`FleetStore`]. It encapsulates
/// all SQL queries and data access logic.
///
/// Every write is a single `INSERT ... RETURNING` statement, so it commits or
/// fails as a unit; referential integrity and username uniqueness are left to
/// the constraints declared in the migrations.
#[derive(Debug, Clone)]
pub struct DbRepository {
    pool: PgPool,
}

const USER_COLUMNS: &str = "id, username, password_hash, role";
const VESSEL_COLUMNS: &str = "id, name, vessel_type, displacement, build_date";
const VOYAGE_COLUMNS: &str = "id, vessel_id, depart_date, return_date";
const CREW_COLUMNS: &str = "id, voyage_id, name, position, address";
const BANK_COLUMNS: &str = "id, name, location";
const VISIT_COLUMNS: &str = "id, voyage_id, bank_id, arrival_date, departure_date, quality";
const CATCH_COLUMNS: &str = "id, visit_id, species, weight";

impl DbRepository {
    /// Creates a new `DbRepository` with a shared database connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FleetStore for DbRepository {
    async fn create_user(&self, new: &NewUser) -> Result<User, DbError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (username, password_hash, role) VALUES ($1, $2, $3) RETURNING {USER_COLUMNS}"
        ))
        .bind(&new.username)
        .bind(&new.password_hash)
        .bind(new.role.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(DbError::from_write)?;
        Ok(user)
    }

    async fn get_user(&self, username: &str) -> Result<User, DbError> {
        sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE username = $1"))
            .bind(username)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DbError::not_found("user", username))
    }

    async fn list_users(&self) -> Result<Vec<User>, DbError> {
        let users = sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users ORDER BY id"))
            .fetch_all(&self.pool)
            .await?;
        Ok(users)
    }

    async fn create_vessel(&self, new: &NewVessel) -> Result<Vessel, DbError> {
        let vessel = sqlx::query_as::<_, Vessel>(&format!(
            "INSERT INTO vessels (name, vessel_type, displacement, build_date) VALUES ($1, $2, $3, $4) RETURNING {VESSEL_COLUMNS}"
        ))
        .bind(&new.name)
        .bind(new.vessel_type.as_deref())
        .bind(new.displacement)
        .bind(new.build_date)
        .fetch_one(&self.pool)
        .await
        .map_err(DbError::from_write)?;
        Ok(vessel)
    }

    async fn get_vessel(&self, id: i64) -> Result<Vessel, DbError> {
        sqlx::query_as::<_, Vessel>(&format!("SELECT {VESSEL_COLUMNS} FROM vessels WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DbError::not_found("vessel", id))
    }

    async fn list_vessels(&self) -> Result<Vec<Vessel>, DbError> {
        let vessels = sqlx::query_as::<_, Vessel>(&format!("SELECT {VESSEL_COLUMNS} FROM vessels ORDER BY id"))
            .fetch_all(&self.pool)
            .await?;
        Ok(vessels)
    }

    async fn create_voyage(&self, new: &NewVoyage) -> Result<Voyage, DbError> {
        let voyage = sqlx::query_as::<_, Voyage>(&format!(
            "INSERT INTO voyages (vessel_id, depart_date, return_date) VALUES ($1, $2, $3) RETURNING {VOYAGE_COLUMNS}"
        ))
        .bind(new.vessel_id)
        .bind(new.depart_date)
        .bind(new.return_date)
        .fetch_one(&self.pool)
        .await
        .map_err(DbError::from_write)?;
        Ok(voyage)
    }

    async fn get_voyage(&self, id: i64) -> Result<Voyage, DbError> {
        sqlx::query_as::<_, Voyage>(&format!("SELECT {VOYAGE_COLUMNS} FROM voyages WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DbError::not_found("voyage", id))
    }

    async fn list_voyages(&self, filter: &VoyageFilter) -> Result<Vec<Voyage>, DbError> {
        let voyages = sqlx::query_as::<_, Voyage>(&format!(
            "SELECT {VOYAGE_COLUMNS} FROM voyages WHERE ($1::BIGINT IS NULL OR vessel_id = $1) ORDER BY id"
        ))
        .bind(filter.vessel_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(voyages)
    }

    async fn create_crew_member(&self, new: &NewCrewMember) -> Result<CrewMember, DbError> {
        let member = sqlx::query_as::<_, CrewMember>(&format!(
            "INSERT INTO crew_members (voyage_id, name, position, address) VALUES ($1, $2, $3, $4) RETURNING {CREW_COLUMNS}"
        ))
        .bind(new.voyage_id)
        .bind(&new.name)
        .bind(new.position.as_deref())
        .bind(new.address.as_deref())
        .fetch_one(&self.pool)
        .await
        .map_err(DbError::from_write)?;
        Ok(member)
    }

    async fn get_crew_member(&self, id: i64) -> Result<CrewMember, DbError> {
        sqlx::query_as::<_, CrewMember>(&format!("SELECT {CREW_COLUMNS} FROM crew_members WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DbError::not_found("crew member", id))
    }

    async fn list_crew_members(&self, filter: &CrewFilter) -> Result<Vec<CrewMember>, DbError> {
        let crew = sqlx::query_as::<_, CrewMember>(&format!(
            "SELECT {CREW_COLUMNS} FROM crew_members WHERE ($1::BIGINT IS NULL OR voyage_id = $1) ORDER BY id"
        ))
        .bind(filter.voyage_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(crew)
    }

    async fn create_bank(&self, new: &NewBank) -> Result<Bank, DbError> {
        let bank = sqlx::query_as::<_, Bank>(&format!(
            "INSERT INTO banks (name, location) VALUES ($1, $2) RETURNING {BANK_COLUMNS}"
        ))
        .bind(&new.name)
        .bind(new.location.as_deref())
        .fetch_one(&self.pool)
        .await
        .map_err(DbError::from_write)?;
        Ok(bank)
    }

    async fn get_bank(&self, id: i64) -> Result<Bank, DbError> {
        sqlx::query_as::<_, Bank>(&format!("SELECT {BANK_COLUMNS} FROM banks WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DbError::not_found("bank", id))
    }

    async fn list_banks(&self) -> Result<Vec<Bank>, DbError> {
        let banks = sqlx::query_as::<_, Bank>(&format!("SELECT {BANK_COLUMNS} FROM banks ORDER BY id"))
            .fetch_all(&self.pool)
            .await?;
        Ok(banks)
    }

    async fn create_visit(&self, new: &NewVisit) -> Result<Visit, DbError> {
        let visit = sqlx::query_as::<_, Visit>(&format!(
            r#"
            INSERT INTO visits (voyage_id, bank_id, arrival_date, departure_date, quality)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {VISIT_COLUMNS}
            "#
        ))
        .bind(new.voyage_id)
        .bind(new.bank_id)
        .bind(new.arrival_date)
        .bind(new.departure_date)
        .bind(new.quality.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(DbError::from_write)?;
        Ok(visit)
    }

    async fn get_visit(&self, id: i64) -> Result<Visit, DbError> {
        sqlx::query_as::<_, Visit>(&format!("SELECT {VISIT_COLUMNS} FROM visits WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DbError::not_found("visit", id))
    }

    async fn list_visits(&self, filter: &VisitFilter) -> Result<Vec<Visit>, DbError> {
        let visits = sqlx::query_as::<_, Visit>(&format!(
            r#"
            SELECT {VISIT_COLUMNS} FROM visits
            WHERE ($1::BIGINT IS NULL OR voyage_id = $1)
              AND ($2::BIGINT IS NULL OR bank_id = $2)
            ORDER BY id
            "#
        ))
        .bind(filter.voyage_id)
        .bind(filter.bank_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(visits)
    }

    async fn create_catch(&self, new: &NewCatch) -> Result<Catch, DbError> {
        let catch = sqlx::query_as::<_, Catch>(&format!(
            "INSERT INTO catches (visit_id, species, weight) VALUES ($1, $2, $3) RETURNING {CATCH_COLUMNS}"
        ))
        .bind(new.visit_id)
        .bind(&new.species)
        .bind(new.weight)
        .fetch_one(&self.pool)
        .await
        .map_err(DbError::from_write)?;
        Ok(catch)
    }

    async fn get_catch(&self, id: i64) -> Result<Catch, DbError> {
        sqlx::query_as::<_, Catch>(&format!("SELECT {CATCH_COLUMNS} FROM catches WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DbError::not_found("catch", id))
    }

    async fn list_catches(&self, filter: &CatchFilter) -> Result<Vec<Catch>, DbError> {
        let catches = sqlx::query_as::<_, Catch>(&format!(
            r#"
            SELECT {CATCH_COLUMNS} FROM catches
            WHERE ($1::BIGINT IS NULL OR visit_id = $1)
              AND ($2::TEXT IS NULL OR species = $2)
            ORDER BY id
            "#
        ))
        .bind(filter.visit_id)
        .bind(filter.species.as_deref())
        .fetch_all(&self.pool)
        .await?;
        Ok(catches)
    }

    async fn catch_facts(&self, filter: &ReportFilter) -> Result<Vec<CatchFact>, DbError> {
        let facts = sqlx::query_as::<_, CatchFact>(
            r#"
            SELECT
                vi.id AS visit_id,
                v.id AS vessel_id,
                v.name AS vessel_name,
                b.id AS bank_id,
                b.name AS bank_name,
                c.species,
                c.weight,
                vi.arrival_date
            FROM
                catches AS c
            JOIN
                visits AS vi ON c.visit_id = vi.id
            JOIN
                voyages AS vo ON vi.voyage_id = vo.id
            JOIN
                vessels AS v ON vo.vessel_id = v.id
            JOIN
                banks AS b ON vi.bank_id = b.id
            WHERE
                ($1::TEXT IS NULL OR c.species = $1)
                AND ($2::BIGINT IS NULL OR b.id = $2)
                AND ($3::DATE IS NULL OR vi.arrival_date >= $3)
                AND ($4::DATE IS NULL OR vi.arrival_date <= $4)
            ORDER BY
                c.id
            "#,
        )
        .bind(filter.species.as_deref())
        .bind(filter.bank_id)
        .bind(filter.period.from)
        .bind(filter.period.to)
        .fetch_all(&self.pool)
        .await?;

        Ok(facts)
    }
}
