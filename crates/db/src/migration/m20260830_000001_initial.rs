//! Initial database migration.
//!
//! Creates the ledger tables (invoices, line items, payments, expenses),
//! the bank reconciliation tables, the append-only audit log, the number
//! sequence counters, and the document registry.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        // ============================================================
        // PART 1: LEDGER TABLES
        // ============================================================
        db.execute_unprepared(INVOICES_SQL).await?;
        db.execute_unprepared(INVOICE_LINE_ITEMS_SQL).await?;
        db.execute_unprepared(PAYMENTS_SQL).await?;
        db.execute_unprepared(EXPENSES_SQL).await?;

        // ============================================================
        // PART 2: BANK RECONCILIATION
        // ============================================================
        db.execute_unprepared(BANK_ACCOUNTS_SQL).await?;
        db.execute_unprepared(BANK_TRANSACTIONS_SQL).await?;

        // ============================================================
        // PART 3: COMPLIANCE
        // ============================================================
        db.execute_unprepared(AUDIT_LOG_SQL).await?;
        db.execute_unprepared(NUMBER_SEQUENCES_SQL).await?;
        db.execute_unprepared(DOCUMENTS_SQL).await?;

        // ============================================================
        // PART 4: INDEXES
        // ============================================================
        db.execute_unprepared(INDEXES_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_ALL_SQL).await?;
        Ok(())
    }
}

// ============================================================
// SQL CONSTANTS
// ============================================================

const INVOICES_SQL: &str = r"
CREATE TABLE invoices (
    id UUID PRIMARY KEY,
    organization_id UUID NOT NULL,
    customer_id UUID NOT NULL,
    project_id UUID,
    document_type VARCHAR(20) NOT NULL,
    invoice_number VARCHAR(50),
    status VARCHAR(20) NOT NULL DEFAULT 'draft',
    issued_date DATE NOT NULL,
    due_date DATE NOT NULL,
    currency VARCHAR(3) NOT NULL,
    subtotal NUMERIC(15, 2) NOT NULL DEFAULT 0,
    tax_amount NUMERIC(15, 2) NOT NULL DEFAULT 0,
    total NUMERIC(15, 2) NOT NULL DEFAULT 0,
    notes TEXT,
    internal_note TEXT,
    deleted_at TIMESTAMPTZ,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),

    -- Finalized invoices always carry a number; drafts never do, and a
    -- draft cancelled before finalization keeps none.
    CONSTRAINT chk_finalized_has_number
        CHECK (status IN ('draft', 'cancelled') OR invoice_number IS NOT NULL),
    CONSTRAINT uq_invoices_number UNIQUE (organization_id, invoice_number)
);
";

const INVOICE_LINE_ITEMS_SQL: &str = r"
CREATE TABLE invoice_line_items (
    id UUID PRIMARY KEY,
    invoice_id UUID NOT NULL REFERENCES invoices(id),
    position INTEGER NOT NULL,
    description TEXT NOT NULL,
    quantity NUMERIC(15, 4) NOT NULL,
    unit_price NUMERIC(15, 2) NOT NULL,
    tax_rate NUMERIC(5, 2) NOT NULL,
    discount_percent NUMERIC(5, 2) NOT NULL DEFAULT 0,

    CONSTRAINT uq_line_items_position UNIQUE (invoice_id, position)
);
";

const PAYMENTS_SQL: &str = r"
CREATE TABLE payments (
    id UUID PRIMARY KEY,
    invoice_id UUID NOT NULL REFERENCES invoices(id),
    amount NUMERIC(15, 2) NOT NULL,
    payment_date DATE NOT NULL,
    method VARCHAR(20),
    reference VARCHAR(255),
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),

    CONSTRAINT chk_payment_positive CHECK (amount > 0)
);
";

const EXPENSES_SQL: &str = r"
CREATE TABLE expenses (
    id UUID PRIMARY KEY,
    organization_id UUID NOT NULL,
    description TEXT NOT NULL,
    amount NUMERIC(15, 2) NOT NULL,
    expense_date DATE NOT NULL,
    receipt_number VARCHAR(50),
    bank_account_id UUID,
    deleted_at TIMESTAMPTZ,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),

    CONSTRAINT chk_expense_positive CHECK (amount > 0)
);
";

const BANK_ACCOUNTS_SQL: &str = r"
CREATE TABLE bank_accounts (
    id UUID PRIMARY KEY,
    organization_id UUID NOT NULL,
    name VARCHAR(255) NOT NULL,
    iban VARCHAR(34),
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
";

const BANK_TRANSACTIONS_SQL: &str = r"
CREATE TABLE bank_transactions (
    id UUID PRIMARY KEY,
    bank_account_id UUID NOT NULL REFERENCES bank_accounts(id),
    amount NUMERIC(15, 2) NOT NULL,
    booking_date DATE NOT NULL,
    purpose TEXT NOT NULL,
    counterparty VARCHAR(255),
    reference VARCHAR(255) NOT NULL,
    reconciliation_status VARCHAR(20) NOT NULL DEFAULT 'unmatched',
    matched_payment_id UUID REFERENCES payments(id),
    matched_expense_id UUID REFERENCES expenses(id),
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),

    -- Statement import idempotency key.
    CONSTRAINT uq_bank_transactions_reference UNIQUE (bank_account_id, reference),
    -- A transaction links to a payment or an expense, never both.
    CONSTRAINT chk_single_link
        CHECK (matched_payment_id IS NULL OR matched_expense_id IS NULL)
);
";

const AUDIT_LOG_SQL: &str = r"
CREATE TABLE audit_log (
    id UUID PRIMARY KEY,
    entity_type VARCHAR(30) NOT NULL,
    entity_id UUID NOT NULL,
    action VARCHAR(20) NOT NULL,
    old_values JSONB,
    new_values JSONB,
    recorded_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    actor_user_id UUID,
    actor_ip VARCHAR(45)
);
";

const NUMBER_SEQUENCES_SQL: &str = r"
CREATE TABLE number_sequences (
    doc_type VARCHAR(20) NOT NULL,
    year INTEGER NOT NULL,
    current_number BIGINT NOT NULL DEFAULT 0,

    PRIMARY KEY (doc_type, year)
);
";

const DOCUMENTS_SQL: &str = r"
CREATE TABLE documents (
    id UUID PRIMARY KEY,
    title VARCHAR(255) NOT NULL,
    path TEXT NOT NULL,
    checksum CHAR(64) NOT NULL,
    linked_entity_kind VARCHAR(20) NOT NULL,
    linked_entity_id UUID NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
);
";

const INDEXES_SQL: &str = r"
CREATE INDEX idx_invoices_org_status ON invoices(organization_id, status);
CREATE INDEX idx_invoices_issued_date ON invoices(issued_date);
CREATE INDEX idx_invoices_deleted_at ON invoices(deleted_at) WHERE deleted_at IS NOT NULL;
CREATE INDEX idx_line_items_invoice ON invoice_line_items(invoice_id);
CREATE INDEX idx_payments_invoice ON payments(invoice_id);
CREATE INDEX idx_expenses_org ON expenses(organization_id);
CREATE INDEX idx_bank_transactions_status ON bank_transactions(bank_account_id, reconciliation_status);
CREATE INDEX idx_audit_log_entity ON audit_log(entity_id, recorded_at);
CREATE INDEX idx_audit_log_recorded_at ON audit_log(recorded_at);
CREATE INDEX idx_documents_linked_entity ON documents(linked_entity_kind, linked_entity_id);
";

const DROP_ALL_SQL: &str = r"
DROP TABLE IF EXISTS documents CASCADE;
DROP TABLE IF EXISTS number_sequences CASCADE;
DROP TABLE IF EXISTS audit_log CASCADE;
DROP TABLE IF EXISTS bank_transactions CASCADE;
DROP TABLE IF EXISTS bank_accounts CASCADE;
DROP TABLE IF EXISTS expenses CASCADE;
DROP TABLE IF EXISTS payments CASCADE;
DROP TABLE IF EXISTS invoice_line_items CASCADE;
DROP TABLE IF EXISTS invoices CASCADE;
";
