use proc_macro::TokenStream;
use quote::{format_ident, quote};
use syn::{parse_macro_input, Data, DeriveInput, Fields, Lit, Meta};

/// Derive macro that generates the column-oriented series struct for a
/// per-timestep flux struct. All fields in the source struct must be `f64`.
///
/// The generated series struct has one `Vec<f64>` per field together with
/// `with_capacity`, `push`, `len`, `is_empty`, `at`, `last` and `columns`.
/// `field_names()` is added to the per-timestep struct, and the series
/// struct implements `xaj_core::traits::FluxesTimeseriesOps` so it can back
/// a `HydrologicalModel`.
///
/// Use `#[fluxes(timeseries_name = "CustomName")]` to override the default
/// series struct name (`{StructName}Timeseries`).
#[proc_macro_derive(Fluxes, attributes(fluxes))]
pub fn derive_fluxes(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    let name = &input.ident;

    let ts_name = extract_timeseries_name(&input)
        .unwrap_or_else(|| format_ident!("{}Timeseries", name));

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => &named.named,
            _ => {
                return syn::Error::new_spanned(
                    name,
                    "Fluxes can only be derived for structs with named fields",
                )
                .to_compile_error()
                .into();
            }
        },
        _ => {
            return syn::Error::new_spanned(name, "Fluxes can only be derived for structs")
                .to_compile_error()
                .into();
        }
    };

    if fields.is_empty() {
        return syn::Error::new_spanned(name, "Fluxes struct must have at least one field")
            .to_compile_error()
            .into();
    }

    let mut field_names = Vec::with_capacity(fields.len());
    let mut field_idents = Vec::with_capacity(fields.len());
    for field in fields {
        let Some(ident) = field.ident.as_ref() else {
            continue;
        };
        if !is_f64_type(&field.ty) {
            return syn::Error::new_spanned(&field.ty, "Fluxes derive: all fields must be f64")
                .to_compile_error()
                .into();
        }
        field_names.push(ident.to_string());
        field_idents.push(ident);
    }

    let n_fields = field_idents.len();
    let first_field = field_idents[0];
    let field_name_strs: Vec<&str> = field_names.iter().map(|s| s.as_str()).collect();

    let ts_fields = field_idents.iter().map(|f| quote! { pub #f: Vec<f64> });
    let with_cap_fields = field_idents.iter().map(|f| quote! { #f: Vec::with_capacity(n) });
    let push_fields = field_idents.iter().map(|f| quote! { self.#f.push(f.#f); });
    let at_fields = field_idents.iter().map(|f| quote! { #f: *self.#f.get(i)? });
    let column_entries = field_idents
        .iter()
        .zip(&field_name_strs)
        .map(|(f, s)| quote! { (#s, self.#f.as_slice()) });

    let expanded = quote! {
        /// Column-oriented series, one vector per flux, indexed by timestep.
        #[derive(Debug, Clone, PartialEq, Default)]
        pub struct #ts_name {
            #(#ts_fields,)*
        }

        impl #ts_name {
            /// Pre-allocate all vectors for `n` timesteps.
            pub fn with_capacity(n: usize) -> Self {
                Self {
                    #(#with_cap_fields,)*
                }
            }

            /// Append a single timestep.
            pub fn push(&mut self, f: &#name) {
                #(#push_fields)*
            }

            /// Number of timesteps stored.
            pub fn len(&self) -> usize {
                self.#first_field.len()
            }

            /// Returns `true` if no timesteps have been stored.
            pub fn is_empty(&self) -> bool {
                self.#first_field.is_empty()
            }

            /// The fluxes recorded at timestep `i`, or `None` if any column
            /// is shorter than `i + 1`.
            pub fn at(&self, i: usize) -> Option<#name> {
                Some(#name {
                    #(#at_fields,)*
                })
            }

            /// The fluxes of the final timestep.
            pub fn last(&self) -> Option<#name> {
                self.len().checked_sub(1).and_then(|i| self.at(i))
            }

            /// Every column paired with its field name, in declaration order.
            pub fn columns(&self) -> [(&'static str, &[f64]); #n_fields] {
                [#(#column_entries),*]
            }
        }

        impl ::xaj_core::traits::FluxesTimeseriesOps<#name> for #ts_name {
            fn with_capacity(n: usize) -> Self {
                #ts_name::with_capacity(n)
            }

            fn push(&mut self, f: &#name) {
                #ts_name::push(self, f)
            }

            fn len(&self) -> usize {
                #ts_name::len(self)
            }

            fn is_empty(&self) -> bool {
                #ts_name::is_empty(self)
            }
        }

        impl #name {
            /// Returns the field names of this flux struct.
            pub fn field_names() -> &'static [&'static str] {
                &[#(#field_name_strs),*]
            }
        }
    };

    expanded.into()
}

fn extract_timeseries_name(input: &DeriveInput) -> Option<proc_macro2::Ident> {
    for attr in &input.attrs {
        if !attr.path().is_ident("fluxes") {
            continue;
        }
        let nested = attr
            .parse_args_with(
                syn::punctuated::Punctuated::<syn::Meta, syn::Token![,]>::parse_terminated,
            )
            .ok()?;
        for meta in nested {
            let Meta::NameValue(nv) = meta else {
                continue;
            };
            if !nv.path.is_ident("timeseries_name") {
                continue;
            }
            if let syn::Expr::Lit(expr_lit) = &nv.value {
                if let Lit::Str(lit_str) = &expr_lit.lit {
                    return Some(format_ident!("{}", lit_str.value()));
                }
            }
        }
    }
    None
}

fn is_f64_type(ty: &syn::Type) -> bool {
    match ty {
        syn::Type::Path(type_path) => type_path.path.is_ident("f64"),
        _ => false,
    }
}
