//! Table definitions.

use rusqlite::Connection;
use tracing::debug;

use crate::error::Result;

/// Create tables and indexes if they do not exist.
///
/// Money columns hold integer cents; quantities, unit prices and rates hold
/// decimal text; dates hold ISO text.
pub fn create_tables(conn: &Connection) -> Result<()> {
    debug!("Ensuring devis tables exist");
    conn.execute_batch(
        "BEGIN;

        CREATE TABLE IF NOT EXISTS devis (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            numero_devis TEXT NOT NULL,
            client TEXT NOT NULL,
            client_adresse TEXT,
            client_telephone TEXT,
            client_email TEXT,
            client_siret TEXT,
            type_travaux TEXT NOT NULL,
            date_devis TEXT NOT NULL,
            date_validite TEXT,
            date_debut_travaux TEXT,
            taux_tva TEXT NOT NULL,
            montant_ht INTEGER NOT NULL,
            montant_tva INTEGER NOT NULL,
            montant_ttc INTEGER NOT NULL,
            statut TEXT NOT NULL,
            materiaux TEXT,
            notes TEXT,
            pdf_original BLOB,
            nom_fichier_pdf TEXT,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );

        -- Backstop against two writers allocating the same number
        CREATE UNIQUE INDEX IF NOT EXISTS idx_devis_numero ON devis(numero_devis);
        CREATE INDEX IF NOT EXISTS idx_devis_client ON devis(client);
        CREATE INDEX IF NOT EXISTS idx_devis_statut ON devis(statut);
        CREATE INDEX IF NOT EXISTS idx_devis_date ON devis(date_devis);

        CREATE TABLE IF NOT EXISTS lignes_devis (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            devis_id INTEGER NOT NULL,
            description TEXT NOT NULL,
            quantite TEXT NOT NULL,
            unite TEXT NOT NULL,
            prix_unitaire TEXT NOT NULL,
            taux_tva TEXT NOT NULL,
            montant_ht INTEGER NOT NULL,
            montant_tva INTEGER NOT NULL,
            montant_ttc INTEGER NOT NULL,
            ordre INTEGER NOT NULL,
            is_section INTEGER NOT NULL DEFAULT 0,
            FOREIGN KEY (devis_id) REFERENCES devis (id) ON DELETE CASCADE
        );

        CREATE INDEX IF NOT EXISTS idx_lignes_devis ON lignes_devis(devis_id);

        COMMIT;",
    )?;
    Ok(())
}
