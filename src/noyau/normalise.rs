// src/noyau/normalise.rs
//
// Normalisation : saisie brute -> forme canonique (jetons).
// Étapes, dans l’ordre (chaque étape travaille sur des jetons entiers,
// jamais sur des sous-chaînes) :
// 1. '^' (ou '**') -> jeton puissance (fait par tokenize)
// 2. nom de fonction collé à un nombre -> appel : sin30 -> sin(30)
//    (même règle pour pi : pi2 -> π(2), refusé ensuite au parse)
//    coefficient devant √ : 2√3 -> 2*√(3), relecture des formes exactes
// 3. mode Degrés : sin( -> sin(deg2rad( et la ')' correspondante -> '))'
// 4. log -> log10 (sqrt et π sont déjà canoniques)
// 5. menu Complexe + '∠' : remplacé par le littéral complexe (polaire.rs)
// 6. parenthèses ouvertes non fermées : ')' ajoutées à la fin

use num_complex::Complex64;
use tracing::debug;

use super::erreur::{ErreurCalc, Resultat};
use super::jetons::{format_tokens, tokenize, Tok};
use super::polaire::{litteral_complexe, resoudre_polaire};
use super::session::{AngleMode, Menu};

/// Noms qui reçoivent des parenthèses quand un nombre les suit directement.
const NOMS_APPEL: [&str; 5] = ["sin", "cos", "tan", "log", "sqrt"];

fn est_trig(nom: &str) -> bool {
    matches!(nom, "sin" | "cos" | "tan")
}

/// API publique : forme canonique en texte (re-lisible par `eval::evaluate`).
pub fn normalize(brut: &str, angle: AngleMode, menu: Menu) -> Resultat<String> {
    Ok(format_tokens(&normaliser(brut, angle, menu, None)?))
}

/// Normalisation complète (étapes 1 à 6). `ans` ne sert qu’aux deux moitiés
/// d’un littéral polaire, évaluées ici.
pub fn normaliser(
    brut: &str,
    angle: AngleMode,
    menu: Menu,
    ans: Option<Complex64>,
) -> Resultat<Vec<Tok>> {
    let jetons = pretraiter(brut, angle)?;

    // 5) polaire
    let jetons = if jetons.contains(&Tok::Angle) {
        if menu != Menu::Complexe {
            return Err(ErreurCalc::syntaxe("'∠' : réservé au mode complexe"));
        }
        litteral_complexe(resoudre_polaire(&jetons, ans)?)
    } else {
        jetons
    };

    // 6) auto-fermeture
    let jetons = fermer_parentheses(jetons);
    debug!(canonique = %format_tokens(&jetons), "normalisation");
    Ok(jetons)
}

/// Étapes 1 à 4 (sans polaire ni auto-fermeture).
pub fn pretraiter(brut: &str, angle: AngleMode) -> Resultat<Vec<Tok>> {
    let jetons = tokenize(brut)?;
    let jetons = inserer_appels(jetons);
    let jetons = convertir_angles(jetons, angle);
    Ok(renommer_fonctions(jetons))
}

/// 2) sin30 -> sin(30), pi2 -> π(2), 2√3 -> 2*√(3)
fn inserer_appels(jetons: Vec<Tok>) -> Vec<Tok> {
    let mut out = Vec::with_capacity(jetons.len() + 4);
    let mut iter = jetons.into_iter().peekable();

    while let Some(t) = iter.next() {
        let appelable = match &t {
            Tok::Ident(nom) => NOMS_APPEL.contains(&nom.as_str()),
            Tok::Pi => true,
            _ => false,
        };
        let coefficient = matches!(t, Tok::Num(_))
            && matches!(iter.peek(), Some(Tok::Ident(nom)) if nom == "sqrt");
        out.push(t);

        if coefficient {
            out.push(Tok::Star);
        }

        if appelable {
            if let Some(Tok::Num(_)) = iter.peek() {
                if let Some(n) = iter.next() {
                    out.extend([Tok::LPar, n, Tok::RPar]);
                }
            }
        }
    }
    out
}

/// 3) Degrés : chaque appel trig reçoit un deg2rad( ... ) autour de son argument.
fn convertir_angles(jetons: Vec<Tok>, angle: AngleMode) -> Vec<Tok> {
    if angle == AngleMode::Radians {
        return jetons;
    }

    let mut out = Vec::with_capacity(jetons.len() + 8);
    // une entrée par '(' encore ouverte : true si c’est l’appel d’une trig
    let mut pile: Vec<bool> = Vec::new();
    let mut iter = jetons.into_iter().peekable();

    while let Some(t) = iter.next() {
        let appel_trig =
            matches!(&t, Tok::Ident(nom) if est_trig(nom)) && iter.peek() == Some(&Tok::LPar);

        if appel_trig {
            iter.next(); // '('
            out.extend([t, Tok::LPar, Tok::Ident("deg2rad".to_string()), Tok::LPar]);
            pile.push(true);
            continue;
        }

        match t {
            Tok::LPar => {
                pile.push(false);
                out.push(Tok::LPar);
            }
            Tok::RPar => {
                if pile.pop() == Some(true) {
                    out.push(Tok::RPar);
                }
                out.push(Tok::RPar);
            }
            autre => out.push(autre),
        }
    }
    out
}

/// 4) log -> log10
fn renommer_fonctions(jetons: Vec<Tok>) -> Vec<Tok> {
    jetons
        .into_iter()
        .map(|t| match t {
            Tok::Ident(nom) if nom == "log" => Tok::Ident("log10".to_string()),
            autre => autre,
        })
        .collect()
}

/// 6) Ajoute autant de ')' qu’il manque (compte global, comme à la saisie).
pub fn fermer_parentheses(mut jetons: Vec<Tok>) -> Vec<Tok> {
    let ouvrantes = jetons.iter().filter(|t| **t == Tok::LPar).count();
    let fermantes = jetons.iter().filter(|t| **t == Tok::RPar).count();
    for _ in fermantes..ouvrantes {
        jetons.push(Tok::RPar);
    }
    jetons
}
