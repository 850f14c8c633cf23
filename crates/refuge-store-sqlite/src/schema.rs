//! SQL schema for the Refuge SQLite store.
//!
//! Executed once at connection startup via `PRAGMA user_version`. Future
//! migrations will be gated on that version number.

/// Full schema DDL; idempotent thanks to `IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;
PRAGMA busy_timeout = 5000;

CREATE TABLE IF NOT EXISTS persons (
    person_id       INTEGER PRIMARY KEY,
    tax_id          TEXT NOT NULL UNIQUE,
    name            TEXT NOT NULL,
    birth_date      TEXT NOT NULL,   -- YYYY-MM-DD
    phone           TEXT NOT NULL,
    secondary_phone TEXT,
    email           TEXT UNIQUE,
    street          TEXT NOT NULL,
    number          TEXT,
    district        TEXT NOT NULL,
    city            TEXT NOT NULL,
    state           TEXT NOT NULL,
    postal_code     TEXT,
    role            TEXT NOT NULL,   -- 'STAFF' | 'RESIDENT'
    active          INTEGER NOT NULL DEFAULT 1
);

CREATE TABLE IF NOT EXISTS shelters (
    shelter_id           INTEGER PRIMARY KEY,
    tax_registration_id  TEXT NOT NULL UNIQUE,
    name                 TEXT NOT NULL,
    capacity             INTEGER NOT NULL CHECK (capacity > 0),
    street               TEXT NOT NULL,
    number               TEXT,
    district             TEXT NOT NULL,
    city                 TEXT NOT NULL,
    state                TEXT NOT NULL,
    postal_code          TEXT,
    phone                TEXT NOT NULL,
    kind                 TEXT NOT NULL,
    legal_representative TEXT NOT NULL,
    active               INTEGER NOT NULL DEFAULT 1
);

CREATE TABLE IF NOT EXISTS staff (
    staff_id            INTEGER PRIMARY KEY,
    person_id           INTEGER NOT NULL UNIQUE REFERENCES persons(person_id),
    registration_number TEXT NOT NULL UNIQUE,
    job_title           TEXT NOT NULL,
    hire_date           TEXT NOT NULL,
    salary              TEXT NOT NULL,   -- canonical decimal string
    shift               TEXT NOT NULL,
    status              TEXT NOT NULL DEFAULT 'ACTIVE',
    shelter_id          INTEGER REFERENCES shelters(shelter_id) ON DELETE SET NULL
);

CREATE TABLE IF NOT EXISTS residents (
    resident_id         INTEGER PRIMARY KEY,
    person_id           INTEGER NOT NULL UNIQUE REFERENCES persons(person_id),
    record_number       TEXT NOT NULL UNIQUE,
    entry_date          TEXT NOT NULL,
    exit_date           TEXT,
    intake_reason       TEXT NOT NULL,
    chemical_dependency INTEGER NOT NULL DEFAULT 0,
    has_disability      INTEGER NOT NULL DEFAULT 0,
    disability_kind     TEXT,
    status              TEXT NOT NULL DEFAULT 'ACTIVE'
);

CREATE TABLE IF NOT EXISTS stays (
    stay_id     INTEGER PRIMARY KEY,
    resident_id INTEGER NOT NULL REFERENCES residents(resident_id),
    shelter_id  INTEGER NOT NULL REFERENCES shelters(shelter_id),
    entry_date  TEXT NOT NULL,
    exit_date   TEXT,
    slot        TEXT,
    active      INTEGER NOT NULL DEFAULT 1,
    exit_reason TEXT,
    notes       TEXT
);

-- At most one open stay per resident.
CREATE UNIQUE INDEX IF NOT EXISTS stays_one_active_per_resident
    ON stays(resident_id) WHERE active = 1;

CREATE INDEX IF NOT EXISTS stays_shelter_active_idx ON stays(shelter_id, active);

-- Open stays never exceed shelter capacity.
CREATE TRIGGER IF NOT EXISTS stays_capacity_guard
BEFORE INSERT ON stays
WHEN NEW.active = 1
 AND (SELECT COUNT(*) FROM stays WHERE shelter_id = NEW.shelter_id AND active = 1)
     >= (SELECT capacity FROM shelters WHERE shelter_id = NEW.shelter_id)
BEGIN
    SELECT RAISE(ABORT, 'shelter capacity exceeded');
END;

-- A discharged stay is never reopened.
CREATE TRIGGER IF NOT EXISTS stays_no_reactivation
BEFORE UPDATE OF active ON stays
WHEN OLD.active = 0 AND NEW.active = 1
BEGIN
    SELECT RAISE(ABORT, 'discharged stays cannot be reopened');
END;

CREATE TABLE IF NOT EXISTS care_logs (
    care_log_id INTEGER PRIMARY KEY,
    resident_id INTEGER NOT NULL REFERENCES residents(resident_id),
    staff_id    INTEGER NOT NULL REFERENCES staff(staff_id),
    date        TEXT NOT NULL,
    category    TEXT NOT NULL,
    description TEXT NOT NULL,
    notes       TEXT
);

CREATE INDEX IF NOT EXISTS care_logs_resident_idx ON care_logs(resident_id);
CREATE INDEX IF NOT EXISTS care_logs_staff_idx    ON care_logs(staff_id);

CREATE TABLE IF NOT EXISTS family_contacts (
    contact_id   INTEGER PRIMARY KEY,
    resident_id  INTEGER NOT NULL REFERENCES residents(resident_id),
    name         TEXT NOT NULL,
    relationship TEXT NOT NULL,
    phone        TEXT NOT NULL,
    emergency    INTEGER NOT NULL DEFAULT 0
);

-- Transfers are strictly append-only.
-- Shelter ids are kept as plain values so the trail outlives deleted shelters.
CREATE TABLE IF NOT EXISTS staff_transfers (
    transfer_id     INTEGER PRIMARY KEY,
    staff_id        INTEGER NOT NULL REFERENCES staff(staff_id),
    from_shelter_id INTEGER,
    to_shelter_id   INTEGER,
    recorded_at     TEXT NOT NULL   -- RFC 3339 UTC
);

CREATE TRIGGER IF NOT EXISTS staff_transfers_no_update
BEFORE UPDATE ON staff_transfers
BEGIN
    SELECT RAISE(ABORT, 'staff_transfers is append-only');
END;

CREATE TRIGGER IF NOT EXISTS staff_transfers_no_delete
BEFORE DELETE ON staff_transfers
BEGIN
    SELECT RAISE(ABORT, 'staff_transfers is append-only');
END;

PRAGMA user_version = 1;
";
