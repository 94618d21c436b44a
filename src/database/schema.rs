//! Esquema de la base de datos
//!
//! Se ejecuta completo al arrancar; todas las sentencias son idempotentes.

pub const SCHEMA: &str = r#"
DO $$ BEGIN
    CREATE TYPE mission_status AS ENUM ('PENDING', 'VALIDATED', 'IN_PROGRESS', 'COMPLETED', 'CANCELLED');
EXCEPTION WHEN duplicate_object THEN null;
END $$;

DO $$ BEGIN
    CREATE TYPE payment_mode AS ENUM ('CARD', 'VOUCHER');
EXCEPTION WHEN duplicate_object THEN null;
END $$;

DO $$ BEGIN
    CREATE TYPE vehicle_status AS ENUM ('AVAILABLE', 'ON_MISSION', 'IN_MAINTENANCE', 'OUT_OF_SERVICE');
EXCEPTION WHEN duplicate_object THEN null;
END $$;

CREATE TABLE IF NOT EXISTS vehicles (
    id UUID PRIMARY KEY,
    license_plate VARCHAR(20) NOT NULL,
    make VARCHAR(100),
    model VARCHAR(100),
    year INTEGER,
    category VARCHAR(50),
    responsible VARCHAR(100),
    department VARCHAR(100),
    current_odometer DOUBLE PRECISION NOT NULL DEFAULT 0 CHECK (current_odometer >= 0),
    odometer_history JSONB NOT NULL DEFAULT '[]'::jsonb,
    status vehicle_status NOT NULL DEFAULT 'AVAILABLE',
    last_maintenance_at TIMESTAMPTZ,
    next_revision_at TIMESTAMPTZ,
    documents JSONB NOT NULL DEFAULT '[]'::jsonb,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE INDEX IF NOT EXISTS idx_vehicles_category ON vehicles (category);
CREATE INDEX IF NOT EXISTS idx_vehicles_responsible ON vehicles (responsible);

CREATE TABLE IF NOT EXISTS missions (
    id UUID PRIMARY KEY,
    vehicle_id UUID NOT NULL,
    driver_id UUID,
    validator_id UUID,
    start_at TIMESTAMPTZ,
    end_at TIMESTAMPTZ,
    route TEXT,
    description TEXT,
    status mission_status NOT NULL DEFAULT 'PENDING',
    validation_comment TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    history JSONB NOT NULL DEFAULT '[]'::jsonb
);

CREATE INDEX IF NOT EXISTS idx_missions_status ON missions (status);
CREATE INDEX IF NOT EXISTS idx_missions_start_at ON missions (start_at);

CREATE TABLE IF NOT EXISTS fuel_events (
    id UUID PRIMARY KEY,
    vehicle_id UUID,
    mission_id UUID,
    user_id UUID,
    fuel_type VARCHAR(50) NOT NULL,
    quantity DOUBLE PRECISION NOT NULL,
    unit_price DOUBLE PRECISION NOT NULL,
    total_amount DOUBLE PRECISION NOT NULL,
    event_at TIMESTAMPTZ NOT NULL,
    station VARCHAR(200),
    odometer DOUBLE PRECISION NOT NULL CHECK (odometer >= 0),
    payment_mode payment_mode NOT NULL,
    payment_reference VARCHAR(100),
    stats JSONB NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_fuel_events_vehicle_at ON fuel_events (vehicle_id, event_at DESC);

CREATE TABLE IF NOT EXISTS fuel_vouchers (
    id UUID PRIMARY KEY,
    number VARCHAR(100) NOT NULL UNIQUE,
    amount NUMERIC(12, 2) NOT NULL,
    issued_at TIMESTAMPTZ NOT NULL,
    used_at TIMESTAMPTZ,
    used BOOLEAN NOT NULL DEFAULT FALSE,
    station VARCHAR(200),
    vehicle_id UUID,
    user_id UUID
);

CREATE TABLE IF NOT EXISTS fuel_cards (
    id UUID PRIMARY KEY,
    number VARCHAR(100) NOT NULL,
    access_code VARCHAR(50),
    expires_on DATE,
    active BOOLEAN NOT NULL DEFAULT TRUE,
    monthly_cap NUMERIC(12, 2) NOT NULL,
    provider VARCHAR(100),
    vehicle_id UUID
);

CREATE INDEX IF NOT EXISTS idx_fuel_cards_number ON fuel_cards (number);

CREATE TABLE IF NOT EXISTS maintenance_records (
    id UUID PRIMARY KEY,
    vehicle_id UUID NOT NULL,
    date TIMESTAMPTZ NOT NULL,
    maintenance_type VARCHAR(100) NOT NULL,
    description TEXT
);

CREATE INDEX IF NOT EXISTS idx_maintenance_vehicle ON maintenance_records (vehicle_id);
"#;
