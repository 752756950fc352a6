//! Procedural macros shared by the qmpack crates.
//!
//! The only macro is [`macro@context`], an attribute that attaches a formatted
//! context line to every error returned by the annotated function:
//!
//! ```ignore
//! #[context("reading tile '{}'", path.display())]
//! fn read(path: &Path) -> anyhow::Result<Blob> {
//!     Ok(Blob::from(std::fs::read(path)?))
//! }
//! ```

mod args;

use args::Args;
use proc_macro::TokenStream;
use proc_macro2::{Ident, Span};
use quote::{ToTokens, quote};
use syn::parse_macro_input;

/// Wraps the body of a function returning `anyhow::Result` and adds
/// `format!(...)` of the given arguments as context to any error.
///
/// The arguments are evaluated only when an error occurs, after the body ran,
/// so they may reference parameters the body borrowed. Use `move, ...` when
/// the body has to take ownership of captured values.
#[proc_macro_attribute]
pub fn context(args: TokenStream, input: TokenStream) -> TokenStream {
	let Args(move_token, format_args) = parse_macro_input!(args);
	let mut input = parse_macro_input!(input as syn::ItemFn);

	if input.sig.asyncness.is_some() {
		return syn::Error::new_spanned(input.sig.asyncness, "#[context] does not support async functions")
			.to_compile_error()
			.into();
	}

	let return_type = match &input.sig.output {
		syn::ReturnType::Default => {
			return syn::Error::new_spanned(&input.sig, "function should return Result")
				.to_compile_error()
				.into();
		}
		syn::ReturnType::Type(_, return_type) => return_type.clone(),
	};

	let body = &input.block;
	let err = Ident::new("err", Span::mixed_site());
	let force_fn_once = Ident::new("force_fn_once", Span::mixed_site());

	let new_body = quote! {
		// Moving a non-`Copy` value into the closure makes borrowck treat it as `FnOnce`.
		let #force_fn_once = ::core::iter::empty::<()>();
		(#move_token || -> #return_type {
			::core::mem::drop(#force_fn_once);
			#body
		})().map_err(|#err| #err.context(format!(#format_args)).into())
	};
	input.block.stmts = vec![syn::Stmt::Expr(syn::Expr::Verbatim(new_body), None)];

	input.into_token_stream().into()
}
