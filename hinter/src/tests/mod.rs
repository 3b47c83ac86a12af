#[cfg(test)]
mod common;
#[cfg(test)]
mod test_arg_hints;
#[cfg(test)]
mod test_fragment;
#[cfg(test)]
mod test_rank;
