//! Default SYSCOHADA chart of accounts.

use super::account::NewAccount;
use super::chart::ChartOfAccounts;
use crate::ledger::error::LedgerError;

/// (code, label, postable)
///
/// Ordered so that every collective account precedes the accounts it groups.
pub const SYSCOHADA_CHART: &[(&str, &str, bool)] = &[
    // Class 1
    ("1", "Comptes de ressources durables", false),
    ("10", "Capital", false),
    ("101", "Capital social", true),
    ("11", "Réserves", false),
    ("111", "Réserve légale", true),
    ("12", "Report à nouveau", false),
    ("121", "Report à nouveau créditeur", true),
    ("129", "Report à nouveau débiteur", true),
    ("13", "Résultat net de l'exercice", false),
    ("131", "Résultat net : bénéfice", true),
    ("139", "Résultat net : perte", true),
    ("16", "Emprunts et dettes assimilées", false),
    ("162", "Emprunts et dettes auprès des établissements de crédit", true),
    // Class 2
    ("2", "Comptes d'actif immobilisé", false),
    ("21", "Immobilisations incorporelles", false),
    ("213", "Logiciels et sites internet", true),
    ("24", "Matériel, mobilier et actifs biologiques", false),
    ("244", "Matériel et mobilier", true),
    ("245", "Matériel de transport", true),
    ("28", "Amortissements", false),
    ("284", "Amortissements du matériel", true),
    // Class 3
    ("3", "Comptes de stocks", false),
    ("31", "Marchandises", true),
    ("32", "Matières premières et fournitures liées", true),
    ("39", "Dépréciations des stocks", true),
    // Class 4
    ("4", "Comptes de tiers", false),
    ("40", "Fournisseurs et comptes rattachés", false),
    ("401", "Fournisseurs, dettes en compte", true),
    ("409", "Fournisseurs débiteurs", true),
    ("41", "Clients et comptes rattachés", false),
    ("411", "Clients", true),
    ("42", "Personnel", false),
    ("422", "Personnel, rémunérations dues", true),
    ("44", "État et collectivités publiques", false),
    ("441", "État, impôt sur les bénéfices", true),
    ("443", "État, TVA facturée", false),
    ("4431", "TVA facturée sur ventes", true),
    ("445", "État, TVA récupérable", false),
    ("4452", "TVA récupérable sur achats", true),
    ("4454", "TVA récupérable sur services extérieurs", true),
    ("47", "Débiteurs et créditeurs divers", false),
    ("471", "Comptes d'attente", true),
    // Class 5
    ("5", "Comptes de trésorerie", false),
    ("52", "Banques", false),
    ("521", "Banques locales", true),
    ("55", "Instruments de monnaie électronique", false),
    ("552", "Monnaie électronique (mobile money)", true),
    ("56", "Banques, crédits de trésorerie", false),
    ("561", "Crédits de trésorerie", true),
    ("57", "Caisse", false),
    ("571", "Caisse siège social", true),
    ("58", "Régies d'avances et virements internes", false),
    ("585", "Virements de fonds", true),
    // Class 6
    ("6", "Comptes de charges des activités ordinaires", false),
    ("60", "Achats et variations de stocks", false),
    ("601", "Achats de marchandises", true),
    ("604", "Achats stockés de matières et fournitures", true),
    ("605", "Autres achats", true),
    ("61", "Transports", false),
    ("618", "Autres frais de transport", true),
    ("62", "Services extérieurs", false),
    ("622", "Locations et charges locatives", true),
    ("63", "Autres services extérieurs", false),
    ("631", "Frais bancaires", true),
    ("64", "Impôts et taxes", false),
    ("641", "Impôts et taxes directs", true),
    ("66", "Charges de personnel", false),
    ("661", "Rémunérations directes versées au personnel national", true),
    ("68", "Dotations aux amortissements", false),
    ("681", "Dotations aux amortissements d'exploitation", true),
    // Class 7
    ("7", "Comptes de produits des activités ordinaires", false),
    ("70", "Ventes", false),
    ("701", "Ventes de marchandises", true),
    ("702", "Ventes de produits finis", true),
    ("706", "Services vendus", true),
    ("707", "Produits accessoires", true),
    ("77", "Revenus financiers et assimilés", false),
    ("771", "Intérêts de prêts", true),
    // Class 8
    ("8", "Comptes des autres charges et des autres produits", false),
    ("81", "Valeurs comptables des cessions d'immobilisations", true),
    ("82", "Produits des cessions d'immobilisations", true),
    ("83", "Charges hors activités ordinaires", true),
    ("84", "Produits hors activités ordinaires", true),
    ("89", "Impôts sur le résultat", false),
    ("891", "Impôts sur les bénéfices de l'exercice", true),
];

/// Loads [`SYSCOHADA_CHART`] into a chart, skipping codes that already exist.
///
/// Seeded accounts are system accounts. Each one is attached to the longest
/// existing code that prefixes it.
///
/// # Errors
///
/// Returns the first creation error other than a duplicate code.
pub fn seed_syscohada(chart: &ChartOfAccounts) -> Result<usize, LedgerError> {
    let mut created = 0;
    for (code, label, postable) in SYSCOHADA_CHART {
        if chart.get(code).is_some() {
            continue;
        }
        let parent_code = (1..code.len())
            .rev()
            .map(|len| &code[..len])
            .find(|prefix| chart.get(prefix).is_some())
            .map(str::to_string);

        chart.create(NewAccount {
            code: (*code).to_string(),
            label: (*label).to_string(),
            normal_side: None,
            parent_code,
            is_postable: *postable,
            is_system: true,
        })?;
        created += 1;
    }
    Ok(created)
}
