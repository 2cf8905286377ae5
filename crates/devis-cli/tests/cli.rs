use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

struct Workspace {
    dir: TempDir,
}

impl Workspace {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("config.json"), "{}").unwrap();
        Self { dir }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    fn devis(&self) -> Command {
        let mut cmd = Command::cargo_bin("devis").unwrap();
        cmd.arg("--config")
            .arg(self.path("config.json"))
            .arg("--db")
            .arg(self.path("devis.db"));
        cmd
    }

    fn create(&self, json: &str) -> serde_json::Value {
        let output = self.devis().arg("create").arg(json).output().unwrap();
        assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
        serde_json::from_slice(&output.stdout).unwrap()
    }
}

fn number(quote: &serde_json::Value) -> String {
    quote["numeroDevis"].as_str().unwrap().to_string()
}

#[test]
fn create_allocates_sequential_numbers() {
    let ws = Workspace::new();

    let first = ws.create(r#"{"client": "Martin", "typeTravaux": "Plomberie", "montant": 1000}"#);
    let second = ws.create(r#"{"client": "Durand", "typeTravaux": "Toiture", "montant": 250}"#);

    let first = number(&first);
    assert!(first.starts_with("DEV-"));
    assert!(first.ends_with("-001"));
    assert!(number(&second).ends_with("-002"));
}

#[test]
fn create_computes_totals_from_lines() {
    let ws = Workspace::new();

    let quote = ws.create(
        r#"{
            "client": "Martin",
            "typeTravaux": "Électricité",
            "tauxTVA": 10,
            "lignes": [
                {"description": "Tableau électrique", "quantite": 1, "prixUnitaire": 450},
                {"description": "Prises", "quantite": 6, "unite": "u", "prixUnitaire": 25.5}
            ]
        }"#,
    );

    assert_eq!(quote["montantHT"].as_f64(), Some(603.0));
    assert_eq!(quote["montantTVA"].as_f64(), Some(60.3));
    assert_eq!(quote["montantTTC"].as_f64(), Some(663.3));
    assert_eq!(quote["lignes"].as_array().map(Vec::len), Some(2));
}

#[test]
fn create_rejects_missing_client() {
    let ws = Workspace::new();

    ws.devis()
        .arg("create")
        .arg(r#"{"client": "", "typeTravaux": "Plomberie"}"#)
        .assert()
        .failure()
        .stderr(predicate::str::contains("client"));
}

#[test]
fn show_update_and_delete() {
    let ws = Workspace::new();
    let quote = ws.create(r#"{"client": "Martin", "typeTravaux": "Plomberie", "montant": 100}"#);
    let number = number(&quote);

    ws.devis()
        .args(["show", &number, "--format", "text"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Martin"))
        .stdout(predicate::str::contains("Plomberie"));

    ws.devis()
        .args(["update", &number, r#"{"statut": "accepté", "montant": 200}"#])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"montantTTC\": 240"));

    ws.devis().args(["delete", &number]).assert().success();

    ws.devis()
        .args(["show", &number])
        .assert()
        .failure()
        .stderr(predicate::str::contains(number.as_str()));
}

#[test]
fn list_filters_by_client() {
    let ws = Workspace::new();
    ws.create(r#"{"client": "Martin", "typeTravaux": "Plomberie", "montant": 100}"#);
    ws.create(r#"{"client": "Durand", "typeTravaux": "Toiture", "montant": 300}"#);

    let output = ws
        .devis()
        .args(["list", "--client", "dur", "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let page: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(page["total"], 1);
    assert_eq!(page["data"][0]["client"], "Durand");
}

#[test]
fn import_reports_rejected_rows() {
    let ws = Workspace::new();
    let csv = ws.path("devis.csv");
    fs::write(
        &csv,
        "client;typeTravaux;dateDevis;montant;statut\n\
         Martin;Plomberie;15/03/2024;1000;brouillon\n\
         Durand;Toiture;16/03/2024;douze;envoyé\n\
         Petit;Peinture;17/03/2024;450,50;accepté\n",
    )
    .unwrap();

    ws.devis()
        .arg("import")
        .arg(&csv)
        .assert()
        .success()
        .stdout(predicate::str::contains("2 quotes created"))
        .stdout(predicate::str::contains("Ligne 3: Montant invalide"));

    ws.devis()
        .args(["list", "--status", "accepté"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Petit"))
        .stdout(predicate::str::contains("540,60"));
}

#[test]
fn import_rejects_unknown_format() {
    let ws = Workspace::new();
    let input = ws.path("devis.txt");
    fs::write(&input, "client\nMartin\n").unwrap();

    ws.devis().arg("import").arg(&input).assert().failure();
}

#[test]
fn export_writes_workbook() {
    let ws = Workspace::new();
    fs::write(
        ws.path("config.json"),
        r#"{"company": {"name": "BATI CONSTRUCTION", "city": "Lyon"}}"#,
    )
    .unwrap();
    ws.create(r#"{"client": "Martin", "typeTravaux": "Plomberie", "montant": 100}"#);
    let output = ws.path("export.xlsx");

    ws.devis()
        .arg("export")
        .arg("-o")
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("Exported 1 quotes"));

    assert!(is_zip(&output));
}

fn is_zip(path: &Path) -> bool {
    fs::read(path).is_ok_and(|data| data.starts_with(b"PK"))
}

#[test]
fn dashboard_and_options_as_json() {
    let ws = Workspace::new();
    ws.create(r#"{"client": "Martin", "typeTravaux": "Plomberie", "montant": 100, "statut": "accepté"}"#);
    ws.create(r#"{"client": "Durand", "typeTravaux": "Toiture", "montant": 50}"#);

    let output = ws.devis().args(["dashboard", "--format", "json"]).output().unwrap();
    assert!(output.status.success());
    let stats: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(stats["total"]["devis"], 2);
    assert_eq!(stats["acceptes"]["devis"], 1);
    assert_eq!(stats["evolution"].as_array().map(Vec::len), Some(6));

    let output = ws.devis().arg("options").output().unwrap();
    assert!(output.status.success());
    let options: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(options["clients"], serde_json::json!(["Durand", "Martin"]));
}

#[test]
fn clients_aggregates_by_name() {
    let ws = Workspace::new();
    ws.create(r#"{"client": "Martin", "typeTravaux": "Plomberie", "montant": 100}"#);
    ws.create(r#"{"client": "martin ", "typeTravaux": "Toiture", "montant": 100}"#);

    let output = ws.devis().args(["clients", "--format", "json"]).output().unwrap();
    assert!(output.status.success());
    let clients: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(clients.as_array().map(Vec::len), Some(1));
    assert_eq!(clients[0]["totalDevis"], 2);
}

#[test]
fn pdf_of_manual_quote_is_not_found() {
    let ws = Workspace::new();
    let quote = ws.create(r#"{"client": "Martin", "typeTravaux": "Plomberie"}"#);

    ws.devis()
        .args(["pdf", &number(&quote), "-o"])
        .arg(ws.path("out.pdf"))
        .assert()
        .failure();
}

#[test]
fn extract_rejects_non_pdf() {
    let ws = Workspace::new();
    let fake = ws.path("devis.pdf");
    fs::write(&fake, "not a pdf").unwrap();

    ws.devis()
        .arg("extract")
        .arg(fake.to_str().unwrap())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Not a PDF file"));
}

#[test]
fn config_init_get_and_set() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("config.json");
    let devis = || {
        let mut cmd = Command::cargo_bin("devis").unwrap();
        cmd.arg("--config").arg(&config);
        cmd
    };

    devis().args(["config", "init"]).assert().success();
    assert!(config.exists());

    devis().args(["config", "init"]).assert().failure();

    devis()
        .args(["config", "get", "quotes.number_prefix"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"DEV\""));

    devis()
        .args(["config", "set", "quotes.number_prefix", "FAC"])
        .assert()
        .success();

    devis()
        .args(["config", "get", "quotes.number_prefix"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"FAC\""));

    devis()
        .args(["config", "set", "quotes.validity_days", "trente"])
        .assert()
        .failure();

    devis()
        .args(["config", "set", "quotes.default_vat_rate", "150"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("between 0 and 100"));

    devis()
        .args(["config", "set", "quotes.unknown", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown setting"));
}

#[test]
fn config_init_prefills_company_and_prefix() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("config.json");
    let devis = || {
        let mut cmd = Command::cargo_bin("devis").unwrap();
        cmd.arg("--config")
            .arg(&config)
            .arg("--db")
            .arg(dir.path().join("devis.db"));
        cmd
    };

    devis()
        .args(["config", "init", "--company", "BATI CONSTRUCTION", "--prefix", "DV"])
        .assert()
        .success();

    devis()
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("BATI CONSTRUCTION"))
        .stdout(predicate::str::contains("DV-AAAA-NNN"));

    devis()
        .args(["create", r#"{"client": "Martin", "typeTravaux": "Plomberie"}"#])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"numeroDevis\": \"DV-"));
}

#[test]
fn missing_explicit_config_is_an_error() {
    let dir = TempDir::new().unwrap();

    Command::cargo_bin("devis")
        .unwrap()
        .arg("--config")
        .arg(dir.path().join("absent.json"))
        .arg("--db")
        .arg(dir.path().join("devis.db"))
        .arg("options")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Config file not found"));
}
