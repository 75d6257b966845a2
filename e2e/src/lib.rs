#[cfg(test)]
mod batch;
#[cfg(test)]
mod errors;
#[cfg(test)]
mod mutations;
#[cfg(test)]
mod passthrough;
#[cfg(test)]
mod probes;
#[cfg(test)]
mod queries;
#[cfg(test)]
mod testkit;
